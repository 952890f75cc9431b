pub(crate) async fn show_alert(message: &str) -> Result<(), String> {
    super::interop::show_alert(message).await
}

pub(crate) async fn prompt_text(message: &str) -> Result<Option<String>, String> {
    super::interop::prompt_text(message).await
}

pub(crate) async fn confirm(message: &str) -> Result<bool, String> {
    super::interop::confirm(message).await
}
