use protected_nav::{get_base_url, get_full_url, AppConfig, ExecutionContext, UrlEnv, UrlResolver};

#[test]
fn test_deployment_host_only() {
    let env = UrlEnv {
        deployment_url: Some("app.example.com".to_string()),
        public_url: None,
    };
    assert_eq!(get_base_url(&ExecutionContext::Server, &env), "https://app.example.com");
}

#[test]
fn test_nothing_configured() {
    assert_eq!(
        get_base_url(&ExecutionContext::Server, &UrlEnv::default()),
        "http://localhost:3000"
    );
}

#[test]
fn test_full_url_with_and_without_slash() {
    let env = UrlEnv {
        deployment_url: None,
        public_url: Some("https://example.com".to_string()),
    };
    let server = ExecutionContext::Server;
    assert_eq!(get_full_url(&server, &env, "/pricing"), "https://example.com/pricing");
    assert_eq!(get_full_url(&server, &env, "pricing"), "https://example.com/pricing");
}

#[test]
fn test_config_feeds_resolver() {
    let config = AppConfig::from_lookup(|key| match key {
        "VERCEL_URL" => Some("preview.vercel.app".to_string()),
        "NEXT_PUBLIC_APP_URL" => Some("https://example.com".to_string()),
        _ => None,
    })
    .unwrap();

    let resolver = UrlResolver::new(ExecutionContext::Server, config.urls.clone());
    assert_eq!(resolver.full_url("/api/callback"), "https://preview.vercel.app/api/callback");

    let browser = UrlResolver::new(ExecutionContext::browser("http://localhost:5173"), config.urls);
    assert_eq!(browser.full_url("protected"), "http://localhost:5173/protected");
}
