use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub p: String,
    pub n: String,
    pub s: String,
    pub t: String,
    pub i: String,
    pub m: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            p: String::new(),
            n: String::new(),
            s: String::new(),
            t: String::new(),
            i: "0".to_string(),
            m: "0".to_string(),
        }
    }
}

impl Params {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Params::default();
        let mut seen = [false; 6];
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "p" => 0,
                "n" => 1,
                "s" => 2,
                "t" => 3,
                "i" => 4,
                "m" => 5,
                _ => continue,
            };
            if seen[slot] {
                continue;
            }
            seen[slot] = true;
            let value = value.into();
            match slot {
                0 => params.p = value,
                1 => params.n = value,
                2 => params.s = value,
                3 => params.t = value,
                4 => params.i = value,
                _ => params.m = value,
            }
        }
        params
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);
        if !self.p.is_empty() {
            pairs.push(("p", self.p.clone()));
        }
        if !self.n.is_empty() {
            pairs.push(("n", self.n.clone()));
        }
        if !self.s.is_empty() {
            pairs.push(("s", self.s.clone()));
        }
        pairs.push(("t", self.t.clone()));
        pairs.push(("i", self.i.clone()));
        pairs.push(("m", self.mode_flag().to_string()));
        pairs
    }

    pub fn base_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if !self.p.is_empty() {
            pairs.push(("p", self.p.clone()));
        }
        if !self.n.is_empty() {
            pairs.push(("n", self.n.clone()));
        }
        pairs.push(("m", self.mode_flag().to_string()));
        pairs
    }

    pub fn is_dev(&self) -> bool {
        self.m == "1"
    }

    fn mode_flag(&self) -> &'static str {
        if self.is_dev() {
            "1"
        } else {
            "0"
        }
    }

    pub fn with_index(&self, index: usize) -> Params {
        Params {
            i: index.to_string(),
            ..self.clone()
        }
    }

    /// The `i` value read the way `parseInt` reads it: leading whitespace,
    /// optional sign, then digits. Anything else counts as zero.
    pub fn raw_index(&self) -> i64 {
        parse_int_prefix(&self.i).unwrap_or(0)
    }
}

pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .map_or(rest.len(), |(index, _)| index);
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
