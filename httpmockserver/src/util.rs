use hyper::HeaderMap;
use std::collections::HashMap;

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, Vec<String>> {
    // it currently ignores header values with opaque characters
    let mut headers: HashMap<String, Vec<String>> = HashMap::new();

    for (key, value) in header_map {
        if let Ok(value) = value.to_str() {
            headers
                .entry(String::from(key.as_str()))
                .or_default()
                .push(String::from(value));
        }
    }

    headers
}
