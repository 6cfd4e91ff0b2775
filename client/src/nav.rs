use wasm_bindgen::JsValue;
use web_sys::{UrlSearchParams, Window};

use sightsketch_shared::trial::Route;
use sightsketch_shared::Params;

use crate::util::log;

const PARAM_KEYS: [&str; 6] = ["p", "n", "s", "t", "i", "m"];

fn search_params(window: &Window) -> Option<UrlSearchParams> {
    let search = window.location().search().ok().unwrap_or_default();
    UrlSearchParams::new_with_str(&search).ok()
}

pub fn read_params(window: &Window) -> Params {
    let Some(query) = search_params(window) else {
        return Params::default();
    };
    let pairs = PARAM_KEYS
        .iter()
        .filter_map(|key| query.get(key).map(|value| (*key, value)));
    Params::from_pairs(pairs)
}

pub fn query_string(window: &Window) -> String {
    let search = window.location().search().ok().unwrap_or_default();
    search.trim_start_matches('?').to_string()
}

pub fn debug_enabled(window: &Window) -> bool {
    let Some(query) = search_params(window) else {
        return false;
    };
    let flag = |key: &str| matches!(query.get(key).as_deref(), Some("1") | Some("true"));
    flag("m") || flag("debug")
}

pub fn build_query(pairs: &[(&'static str, String)]) -> Result<String, JsValue> {
    let query = UrlSearchParams::new()?;
    for (key, value) in pairs {
        query.append(key, value);
    }
    Ok(String::from(query.to_string()))
}

pub fn goto(window: &Window, page: &str, pairs: &[(&'static str, String)]) -> Result<(), JsValue> {
    let href = format!("{page}?{}", build_query(pairs)?);
    log(debug_enabled(window), &format!("navigate href={href}"));
    window.location().set_href(&href)
}

pub fn follow(window: &Window, route: &Route) -> Result<(), JsValue> {
    goto(window, &route.page.file_name(), &route.params.to_pairs())
}
