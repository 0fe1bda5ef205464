use ferrous_osdns_application::ports::NetworkObserver;
use ferrous_osdns_domain::{LanPolicy, NetworkSnapshot};
use ferrous_osdns_infrastructure::dns::network::NetworkChangeDetector;
use std::net::SocketAddr;
use std::sync::Arc;

fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_lan_server_transition_sequence() {
    let detector = NetworkChangeDetector::default();

    // New LAN server
    let snapshot = detector.refresh(&["192.168.1.1", "8.8.8.8"]);
    assert_eq!(snapshot.current_lan_server, Some(addr("192.168.1.1:53")));
    assert_eq!(snapshot.last_lan_server, None);
    assert_eq!(snapshot.public_servers, vec![addr("8.8.8.8:53")]);

    // Same LAN server again
    let snapshot = detector.refresh(&["192.168.1.1", "8.8.8.8"]);
    assert_eq!(snapshot.current_lan_server, None);
    assert_eq!(snapshot.last_lan_server, Some(addr("192.168.1.1:53")));

    // Different LAN server; the first LAN entry wins
    let snapshot = detector.refresh(&["10.0.0.1", "192.168.1.1", "8.8.8.8"]);
    assert_eq!(snapshot.current_lan_server, Some(addr("10.0.0.1:53")));
    assert_eq!(snapshot.last_lan_server, Some(addr("192.168.1.1:53")));

    // LAN gone
    let snapshot = detector.refresh(&["8.8.8.8"]);
    assert_eq!(snapshot.current_lan_server, None);
    assert_eq!(snapshot.last_lan_server, None);
    assert_eq!(snapshot.public_servers, vec![addr("8.8.8.8:53")]);
}

#[test]
fn test_refresh_publishes_returned_snapshot() {
    let detector = NetworkChangeDetector::default();

    let returned = detector.refresh(&["172.16.0.53", "1.1.1.1"]);

    assert!(Arc::ptr_eq(&returned, &detector.current_snapshot()));
}

#[test]
fn test_public_servers_replaced_on_every_refresh() {
    let detector = NetworkChangeDetector::default();
    detector.refresh(&["8.8.8.8", "1.1.1.1"]);

    let snapshot = detector.refresh(&["9.9.9.9"]);

    assert_eq!(snapshot.public_servers, vec![addr("9.9.9.9:53")]);
}

#[test]
fn test_repeated_public_server_kept_once_in_first_position() {
    let detector = NetworkChangeDetector::default();

    let snapshot = detector.refresh(&["1.1.1.1", "8.8.8.8", "1.1.1.1"]);

    assert_eq!(
        snapshot.public_servers,
        vec![addr("1.1.1.1:53"), addr("8.8.8.8:53")]
    );
    assert_eq!(snapshot.candidate_count(), 2);
}

#[test]
fn test_non_ip_entries_skipped() {
    let detector = NetworkChangeDetector::default();

    let snapshot = detector.refresh(&["dns.example.com", "8.8.4.4"]);

    assert_eq!(snapshot.candidate_count(), 1);
}

#[test]
fn test_empty_observation_clears_everything() {
    let detector = NetworkChangeDetector::default();
    detector.refresh(&["192.168.1.1", "8.8.8.8"]);

    let snapshot = detector.refresh::<&str>(&[]);

    assert_eq!(*snapshot, NetworkSnapshot::empty());
}

#[test]
fn test_custom_policy_marks_loopback_as_lan() {
    let policy = LanPolicy::from_cidrs(&["127.0.0.0/8"]).unwrap();
    let detector = NetworkChangeDetector::new(policy);

    let snapshot = detector.refresh(&["127.0.0.53", "192.168.1.1"]);

    assert_eq!(snapshot.current_lan_server, Some(addr("127.0.0.53:53")));
    assert_eq!(snapshot.public_servers, vec![addr("192.168.1.1:53")]);
}

#[test]
fn test_observer_port_delegates() {
    let detector = NetworkChangeDetector::default();
    let observer: &dyn NetworkObserver = &detector;

    observer.refresh(&["fe80::1%eth0".to_string(), "2001:4860:4860::8888".to_string()]);

    let snapshot = observer.current_snapshot();
    assert_eq!(snapshot.current_lan_server, Some(addr("[fe80::1]:53")));
    assert_eq!(
        snapshot.public_servers,
        vec![addr("[2001:4860:4860::8888]:53")]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_publish_consistent_snapshots() {
    let detector = Arc::new(NetworkChangeDetector::default());
    let mut handles = Vec::new();

    for i in 0..10u8 {
        let detector = Arc::clone(&detector);
        handles.push(tokio::spawn(async move {
            let lan = format!("192.168.1.{}", i + 1);
            for _ in 0..100 {
                let snapshot = detector.refresh(&[lan.as_str(), "8.8.8.8"]);
                assert_eq!(snapshot.public_servers, vec![addr("8.8.8.8:53")]);
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let snapshot = detector.current_snapshot();
    assert_eq!(snapshot.public_servers, vec![addr("8.8.8.8:53")]);
    assert!(snapshot.current_lan_server.is_some() || snapshot.last_lan_server.is_some());
}

#[test]
fn test_readers_never_see_torn_snapshot() {
    let detector = Arc::new(NetworkChangeDetector::default());
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let writer = {
        let detector = Arc::clone(&detector);
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            let lists: [&[&str]; 2] = [&["10.0.0.1", "8.8.8.8"], &["10.0.0.2", "1.1.1.1"]];
            let mut i = 0;
            while !stop.load(std::sync::atomic::Ordering::Relaxed) {
                detector.refresh(lists[i % 2]);
                i += 1;
            }
        })
    };

    for _ in 0..10_000 {
        let snapshot = detector.current_snapshot();
        let public = snapshot.public_servers.first().copied();
        match snapshot.current_lan_server {
            Some(lan) if lan == addr("10.0.0.1:53") => assert_eq!(public, Some(addr("8.8.8.8:53"))),
            Some(lan) if lan == addr("10.0.0.2:53") => assert_eq!(public, Some(addr("1.1.1.1:53"))),
            _ => {}
        }
    }

    stop.store(true, std::sync::atomic::Ordering::Relaxed);
    writer.join().unwrap();
}
