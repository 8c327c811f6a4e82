use std::time::Duration;
use tpl_assist::options::{ModelOptions, TransportOptions};
use tpl_assist::providers::{GroqModel, OpenAiModel};

#[test]
fn test_transport_options_builder() {
    let options = TransportOptions::new()
        .with_timeout(Duration::from_secs(30))
        .with_proxy("http://proxy.example.com".to_string())
        .with_header("X-Custom-Header".to_string(), "Value".to_string())
        .with_user_agent("snap/1.0");

    match options {
        TransportOptions::Http {
            timeout,
            proxy,
            headers,
            user_agent,
        } => {
            assert_eq!(timeout, Some(Duration::from_secs(30)));
            assert_eq!(proxy, Some("http://proxy.example.com".to_string()));
            assert_eq!(user_agent.as_deref(), Some("snap/1.0"));

            let headers = headers.unwrap();
            assert_eq!(headers.get("X-Custom-Header"), Some(&"Value".to_string()));
        }
    }
}

#[test]
fn test_model_options_new() {
    let options: ModelOptions<OpenAiModel> = ModelOptions::new("gpt-4o-mini");

    assert_eq!(options.model, "gpt-4o-mini");
    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
}

#[test]
fn test_model_options_custom() {
    let options = ModelOptions::<GroqModel>::new("llama-3.1-8b-instant")
        .with_system("Usa i tools MCP se serve")
        .with_temperature(0.0)
        .with_max_tokens(512);

    assert_eq!(options.model, "llama-3.1-8b-instant");
    assert_eq!(options.system.as_deref(), Some("Usa i tools MCP se serve"));
    assert_eq!(options.temperature, Some(0.0));
    assert_eq!(options.max_tokens, Some(512));
    assert_eq!(options.provider.parallel_tool_calls, None);
}
