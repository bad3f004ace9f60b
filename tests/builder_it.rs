// self
use rest_api_client::{
	auth::{AuthorizationHeaderHandler, BearerAuthentication, NoAuthentication},
	builder::{RestClientBuilder, RestClientSettings},
	error::{ConfigError, TransportError},
	provider::{GrantType, TokenProviderConfig},
	transport::{HttpRequest, HttpTransport, TransportFuture},
	url::Url,
};

struct Offline;
impl HttpTransport for Offline {
	fn send(&self, _request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(std::future::ready(Err(TransportError::network(std::io::Error::other("offline")))))
	}
}

fn provider_config() -> TokenProviderConfig {
	TokenProviderConfig::builder(GrantType::ClientCredentials)
		.token_endpoint(Url::parse("https://id.example.com/token").expect("URL should parse."))
		.client_id("client")
		.build()
		.expect("Provider config should build.")
}

#[test]
fn exactly_one_authentication_handler_is_required() {
	let err = RestClientBuilder::new()
		.transport(Offline)
		.clear_authentication_handler()
		.build()
		.expect_err("Zero handlers should be rejected.");

	assert!(matches!(err, ConfigError::AuthenticationHandlerCount { count: 0 }));

	let err = RestClientBuilder::new()
		.transport(Offline)
		.add_authentication_handler(AuthorizationHeaderHandler::new(BearerAuthentication::new(
			"token",
		)))
		.build()
		.expect_err("Two handlers should be rejected.");

	assert!(matches!(err, ConfigError::AuthenticationHandlerCount { count: 2 }));

	RestClientBuilder::new()
		.transport(Offline)
		.build()
		.expect("The default no-op handler should satisfy the rule.");
	RestClientBuilder::new()
		.transport(Offline)
		.clear_authentication_handler()
		.authentication_handler(NoAuthentication)
		.bearer_authentication("replaced")
		.build()
		.expect("Configuring a handler should replace the previous one.");
}

#[test]
fn duplicate_token_providers_are_rejected() {
	let err = RestClientBuilder::new()
		.transport(Offline)
		.token_provider("Identity", provider_config())
		.token_provider("IDENTITY", provider_config())
		.build()
		.expect_err("Duplicate provider names should be rejected.");

	assert!(matches!(err, ConfigError::DuplicateProvider { .. }));

	let err = RestClientBuilder::new()
		.transport(Offline)
		.token_provider("has space", provider_config())
		.build()
		.expect_err("Invalid provider names should be rejected.");

	assert!(matches!(err, ConfigError::InvalidProviderName(_)));
}

#[test]
fn limits_are_validated() {
	let err = RestClientBuilder::new()
		.transport(Offline)
		.max_response_content_buffer_size(0)
		.build()
		.expect_err("Zero buffer size should be rejected.");

	assert!(matches!(err, ConfigError::InvalidBufferSize));

	let err = RestClientBuilder::new()
		.transport(Offline)
		.timeout(time::Duration::ZERO)
		.build()
		.expect_err("Zero timeout should be rejected.");

	assert!(matches!(err, ConfigError::InvalidTimeout));
}

#[test]
fn settings_configure_the_client() {
	let settings: RestClientSettings = serde_json::from_str(
		r#"{
			"base_address": "https://api.example.com/v1",
			"default_headers": { "X-Client": ["sdk"] },
			"max_response_content_buffer_size": 1024,
			"token_providers": {
				"Default-Token-Provider": {
					"token_endpoint": "https://id.example.com/token",
					"client_id": "client",
					"client_authentication_method": "header_basic"
				}
			}
		}"#,
	)
	.expect("Settings should deserialize.");
	let client = RestClientBuilder::from_settings(settings)
		.expect("Settings should apply.")
		.transport(Offline)
		.build()
		.expect("Client should build.");

	assert_eq!(
		client.resolve_url("orders").expect("URL should resolve.").as_str(),
		"https://api.example.com/v1/orders"
	);
	assert_eq!(client.options().default_headers.get("x-client"), Some("sdk"));
	assert_eq!(client.options().max_response_content_buffer_size, 1024);
	assert_eq!(client.token_service().providers().count(), 1);
	assert!(client.token_service().provider("default-token-provider").is_ok());
}
