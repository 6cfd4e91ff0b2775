use crate::params::Params;
use crate::sessions;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn or_empty(value: &str) -> String {
    if value.is_empty() {
        "(empty)".to_string()
    } else {
        escape_html(value)
    }
}

pub fn dev_footer_html(params: &Params, query: &str, last_message: &str) -> String {
    let mode = if params.is_dev() {
        "DEV (m=1)"
    } else {
        "EXPERIMENT (m=0)"
    };
    let query = if query.is_empty() {
        "(none)".to_string()
    } else {
        escape_html(query)
    };
    let session = sessions::display_for(&params.s).unwrap_or("(unknown session)");
    let index = if params.i.is_empty() { "0" } else { &params.i };
    let message = if last_message.is_empty() {
        "(none)".to_string()
    } else {
        escape_html(last_message)
    };
    format!(
        "<div class=\"kv\"><b>Mode</b><span>{mode}</span></div>\
         <div class=\"kv\"><b>Query String</b><span>{query}</span></div>\
         <div class=\"kv\"><b>Parsed</b><span>\
         p: {p}<br/>n: {n}<br/>s: {s} &mdash; {session}<br/>t: {t}<br/>i: {i}<br/>m: {m}\
         </span></div>\
         <div class=\"kv\"><b>Firebase message</b><span>{message}</span></div>",
        p = or_empty(&params.p),
        n = or_empty(&params.n),
        s = or_empty(&params.s),
        t = or_empty(&params.t),
        i = escape_html(index),
        m = escape_html(&params.m),
    )
}
