use std::collections::HashMap;

use rocket::http::{Cookie, CookieJar};

pub const HISTORY_COOKIE: &str = "history";

/// Poll indices this browser has voted on, per station key. Display only,
/// vote counting never reads it.
///
/// Stored hex encoded JSON so any station key survives the cookie syntax.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct History(HashMap<String, Vec<usize>>);

impl History {
    pub fn load(cookies: &CookieJar<'_>) -> Self {
        cookies
            .get(HISTORY_COOKIE)
            .and_then(|c| Self::decode(c.value()))
            .unwrap_or_default()
    }

    pub fn save(&self, cookies: &CookieJar<'_>) {
        cookies.add(Cookie::new(HISTORY_COOKIE, self.encode()));
    }

    pub fn get(&self, key: &str) -> &[usize] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn record(&mut self, key: &str, index: usize) {
        let indices = self.0.entry(key.to_string()).or_default();
        if !indices.contains(&index) {
            indices.push(index);
        }
    }

    fn encode(&self) -> String {
        // a map of strings to integers always serializes
        hex::encode(serde_json::to_vec(&self.0).unwrap_or_default())
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = hex::decode(value).ok()?;
        serde_json::from_slice(&bytes).ok().map(History)
    }
}
