use serde::Serialize;
use wasm_bindgen::JsCast;

/// Offers `value` to the user as a pretty-printed JSON download.
pub fn download_json<T: Serialize>(filename: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    let href = format!(
        "data:application/json;charset=utf-8,{}",
        String::from(js_sys::encode_uri_component(&json))
    );

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document available")?;
    let link = document
        .create_element("a")
        .map_err(|_| "could not create download link")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "download link is not an anchor")?;
    link.set_href(&href);
    link.set_download(filename);
    link.click();
    Ok(())
}
