use ferrous_osdns_application::ports::NameserverSource;
use ferrous_osdns_infrastructure::system::{parse_resolv_conf, ResolvConfReader};
use std::io::Write;

#[test]
fn test_parse_keeps_nameservers_in_order() {
    let content = "\
# Generated by NetworkManager
search lan
nameserver 192.168.1.1
; old entry
;nameserver 10.0.0.1
options edns0 trust-ad
nameserver 2001:4860:4860::8888
nameserver   8.8.8.8   # trailing comment
";

    assert_eq!(
        parse_resolv_conf(content),
        vec!["192.168.1.1", "2001:4860:4860::8888", "8.8.8.8"]
    );
}

#[test]
fn test_parse_ignores_incomplete_lines() {
    assert!(parse_resolv_conf("nameserver\nnameservers 1.1.1.1\n").is_empty());
}

#[tokio::test]
async fn test_reader_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "nameserver 10.0.0.1").unwrap();
    writeln!(file, "nameserver 9.9.9.9").unwrap();

    let reader = ResolvConfReader::with_path(file.path().to_string_lossy().to_string());
    let nameservers = reader.nameservers().await.unwrap();

    assert_eq!(nameservers, vec!["10.0.0.1", "9.9.9.9"]);
}

#[tokio::test]
async fn test_reader_missing_file_is_error() {
    let reader = ResolvConfReader::with_path("/nonexistent/resolv.conf");
    assert!(reader.nameservers().await.is_err());
}
