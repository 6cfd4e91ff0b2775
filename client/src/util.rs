use sightsketch_shared::seed::{random_seed, seed_from_participant};
use sightsketch_shared::Params;

fn random_u32() -> u32 {
    (js_sys::Math::random() * (u32::MAX as f64 + 1.0)) as u32
}

fn random_u64() -> u64 {
    (u64::from(random_u32()) << 32) | u64::from(random_u32())
}

pub fn coin_flip() -> bool {
    js_sys::Math::random() < 0.5
}

pub fn colour_seed(params: &Params) -> String {
    seed_from_participant(&params.p).unwrap_or_else(|| random_seed(random_u64()))
}

pub fn log(debug: bool, message: &str) {
    if debug {
        web_sys::console::log_1(&message.into());
    }
}

pub fn send_event_simulated(message: &str) -> String {
    web_sys::console::log_2(
        &"[Simulated Firebase] Sent message:".into(),
        &message.into(),
    );
    message.to_string()
}
