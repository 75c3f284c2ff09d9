//! `"ip:port"` peer-key helpers, matching the original node's habit of
//! addressing peers by that string rather than a structured socket address.

pub fn peer_key(ip: &str, port: u16) -> String {
    format!("{ip}:{port}")
}

pub fn split_peer_key(key: &str) -> Option<(&str, u16)> {
    let (ip, port) = key.rsplit_once(':')?;
    let port: u16 = port.parse().ok()?;
    Some((ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let key = peer_key("127.0.0.1", 8080);
        assert_eq!(key, "127.0.0.1:8080");
        assert_eq!(split_peer_key(&key), Some(("127.0.0.1", 8080)));
    }

    #[test]
    fn rejects_malformed_key() {
        assert_eq!(split_peer_key("no-port-here"), None);
    }
}
