mod api;
mod config;
mod ui;
mod util;

/// The [`tribune_client::api::Session`] that survives a page reload lives in
/// local storage under this key.
pub const KEY_LOGIN: &str = "login";

lazy_static::lazy_static! {
    pub static ref CLIENT: reqwest::Client = reqwest::Client::new();
}

fn main() {
    tracing_wasm::set_as_global_default();
    yew::Renderer::<ui::App>::new().render();
}
