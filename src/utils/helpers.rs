/// Name echoed back in every response envelope.
pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string())
}
