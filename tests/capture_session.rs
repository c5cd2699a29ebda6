use std::collections::HashMap;
use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::ipv4::MutableIpv4Packet;
use pnet::packet::MutablePacket;
use pnet::util::MacAddr;
use tempfile::TempDir;

use packet_capture::{
    CaptureConfig, CaptureSession, EndpointResolver, FrameSource, MemorySource, NameResolver,
    RecordEmitter, ResolverConfig, SessionState,
};

const CLIENT_MAC: MacAddr = MacAddr(0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e);
const GATEWAY_MAC: MacAddr = MacAddr(0xf0, 0x9f, 0xc2, 0x10, 0x20, 0x30);
const CLIENT_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 20);
const SERVER_IP: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);
const DNS_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);

fn build_frame(
    src_mac: MacAddr,
    dst_mac: MacAddr,
    src_ip: Ipv4Addr,
    dst_ip: Ipv4Addr,
    protocol: IpNextHeaderProtocol,
) -> Vec<u8> {
    let mut buffer = vec![0u8; 14 + 20 + 8];

    let mut ethernet = MutableEthernetPacket::new(&mut buffer).unwrap();
    ethernet.set_source(src_mac);
    ethernet.set_destination(dst_mac);
    ethernet.set_ethertype(EtherTypes::Ipv4);

    let mut ipv4 = MutableIpv4Packet::new(ethernet.payload_mut()).unwrap();
    ipv4.set_version(4);
    ipv4.set_header_length(5);
    ipv4.set_total_length(28);
    ipv4.set_ttl(64);
    ipv4.set_next_level_protocol(protocol);
    ipv4.set_source(src_ip);
    ipv4.set_destination(dst_ip);

    buffer
}

/// Name service stub with a fixed table; everything else fails.
struct TableResolver(HashMap<Ipv4Addr, &'static str>);

impl NameResolver for TableResolver {
    fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String> {
        self.0.get(&addr).map(|name| name.to_string())
    }
}

/// Name service that is never reachable.
struct UnreachableResolver;

impl NameResolver for UnreachableResolver {
    fn reverse_lookup(&self, _addr: Ipv4Addr) -> Option<String> {
        std::thread::sleep(Duration::from_millis(200));
        None
    }
}

fn scenario_source() -> MemorySource {
    MemorySource::from_frames(
        "test0",
        vec![
            build_frame(
                CLIENT_MAC,
                GATEWAY_MAC,
                CLIENT_IP,
                SERVER_IP,
                IpNextHeaderProtocols::Tcp,
            ),
            build_frame(
                GATEWAY_MAC,
                CLIENT_MAC,
                DNS_IP,
                CLIENT_IP,
                IpNextHeaderProtocols::Udp,
            ),
            vec![0xde, 0xad, 0xbe, 0xef],
        ],
    )
    .with_poll_interval(Duration::from_millis(20))
}

/// Split a well-formed record the way the dashboard's line pattern does.
fn parse_record(line: &str) -> Option<(u64, String, String, String, String, u8, String)> {
    let rest = line.strip_prefix("Packet ")?;
    let (seq, rest) = rest.split_once(": ")?;
    let (src, rest) = rest.split_once(" -> ")?;
    let (dst, rest) = rest.split_once(", Src MAC: ")?;
    let (src_mac, rest) = rest.split_once(", Dst MAC: ")?;
    let (dst_mac, rest) = rest.split_once(", Protocol: ")?;
    let (protocol, name) = rest.split_once(' ')?;

    if !src.chars().chain(dst.chars()).all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    Some((
        seq.parse().ok()?,
        src.to_string(),
        dst.to_string(),
        src_mac.to_string(),
        dst_mac.to_string(),
        protocol.parse().ok()?,
        name.to_string(),
    ))
}

#[test]
fn three_frame_scenario_writes_three_records() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("capture.txt");

    let config = CaptureConfig::new(1, &path)
        .unwrap()
        .with_resolver(ResolverConfig::default().with_timeout(Some(Duration::from_millis(500))));
    let sink = config.open_sink().unwrap();

    let names = HashMap::from([(CLIENT_IP, "laptop.lan"), (DNS_IP, "router.lan")]);
    let resolver = EndpointResolver::new(Arc::new(TableResolver(names)), &config.resolver);

    let mut session = CaptureSession::new(
        scenario_source(),
        resolver,
        RecordEmitter::new(sink),
        config.duration,
    );

    let started = Instant::now();
    let summary = session.run().unwrap();
    let elapsed = started.elapsed();

    assert_eq!(session.state(), SessionState::Terminated);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.malformed, 1);
    drop(session);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "{contents}");

    let first = parse_record(lines[0]).unwrap();
    assert_eq!(
        first,
        (
            1,
            "192.168.1.20".to_string(),
            "93.184.216.34".to_string(),
            "00:1A:2B:3C:4D:5E".to_string(),
            "F0:9F:C2:10:20:30".to_string(),
            6,
            "laptop.lan".to_string(),
        )
    );

    let second = parse_record(lines[1]).unwrap();
    assert_eq!(second.0, 2);
    assert_eq!(second.1, "192.168.1.1");
    assert_eq!(second.2, "192.168.1.20");
    assert_eq!(second.5, 17);
    assert_eq!(second.6, "router.lan");

    assert_eq!(lines[2], "Packet 3: MALFORMED (too short: 4 of 34 bytes)");
    assert!(parse_record(lines[2]).is_none());
}

#[test]
fn unreachable_name_service_falls_back_to_addresses() {
    let config = ResolverConfig::default().with_timeout(Some(Duration::from_millis(20)));
    let resolver = EndpointResolver::new(Arc::new(UnreachableResolver), &config);

    let mut session = CaptureSession::new(
        scenario_source(),
        resolver,
        RecordEmitter::new(Vec::new()),
        Duration::from_millis(500),
    );

    let summary = session.run().unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.resolver.resolved, 0);
    assert_eq!(summary.resolver.fallbacks, 4);

    let output = String::from_utf8(session.into_sink()).unwrap();
    let first = output.lines().next().unwrap();
    assert!(first.ends_with("Protocol: 6 192.168.1.20"), "{first}");
}

#[test]
fn no_records_after_termination() {
    let mut session = CaptureSession::new(
        scenario_source(),
        EndpointResolver::disabled(),
        RecordEmitter::new(Vec::new()),
        Duration::from_millis(100),
    );
    let token = session.cancellation_token();

    session.run().unwrap();
    assert!(token.is_cancelled());

    let records = String::from_utf8(session.into_sink()).unwrap().lines().count();
    assert_eq!(records, 3);
}

/// Interface that always has another frame ready.
struct SaturatedSource {
    frame: Vec<u8>,
}

impl FrameSource for SaturatedSource {
    fn next_frame(&mut self) -> io::Result<&[u8]> {
        Ok(&self.frame)
    }

    fn interface_name(&self) -> &str {
        "saturated0"
    }
}

#[test]
fn saturated_interface_still_stops_at_deadline() {
    let source = SaturatedSource {
        frame: build_frame(
            CLIENT_MAC,
            GATEWAY_MAC,
            CLIENT_IP,
            SERVER_IP,
            IpNextHeaderProtocols::Udp,
        ),
    };
    let mut session = CaptureSession::new(
        source,
        EndpointResolver::disabled(),
        RecordEmitter::new(Vec::new()),
        Duration::from_millis(300),
    );

    let started = Instant::now();
    let summary = session.run().unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(1300), "took {elapsed:?}");
    assert!(summary.frames > 0);
    assert_eq!(summary.protocol_count(17), summary.frames);

    let output = String::from_utf8(session.into_sink()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len() as u64, summary.frames);
    assert!(lines
        .last()
        .unwrap()
        .starts_with(&format!("Packet {}: ", summary.frames)));
}
