use super::HeadersMutation;
use hyper::{header::HeaderName, HeaderMap};
use log::warn;

#[derive(Debug)]
pub struct RemoveHeadersMutation {
    headers: Vec<HeaderName>,
}

impl RemoveHeadersMutation {
    pub fn new<S: AsRef<str>, I: IntoIterator<Item = S>>(headers: I) -> Self {
        Self {
            headers: headers
                .into_iter()
                .filter_map(|name| match HeaderName::from_bytes(name.as_ref().as_bytes()) {
                    Ok(name) => Some(name),
                    Err(_) => {
                        warn!("Ignoring invalid header name \"{}\"", name.as_ref());
                        None
                    }
                })
                .collect(),
        }
    }
}

impl HeadersMutation for RemoveHeadersMutation {
    fn mutate(&self, headers: &mut HeaderMap) {
        for header_name in &self.headers {
            headers.remove(header_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn removes_headers_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("abc"));
        headers.insert("accept", HeaderValue::from_static("*/*"));

        RemoveHeadersMutation::new(vec!["X-Auth-Token", "not a header"]).mutate(&mut headers);

        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("accept"));
    }
}
