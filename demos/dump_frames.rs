//! Replay a pcap file and print one line per decoded layer.
//!
//! Usage: dump_frames <file.pcap>

use std::env;
use std::fs::File;
use std::process::exit;

use frame_parser::*;

struct Printer;

impl FrameSink for Printer {
    fn frame(&mut self, frame: &DecodedFrame) {
        println!(
            "{} -> {} [{}]",
            frame.ethernet.source, frame.ethernet.destination, frame.ethernet.ethertype
        );
        match &frame.network {
            NetworkData::Ipv4(ip, transport) => {
                println!(
                    "  IPv4 {} -> {} ttl={} proto={}",
                    ip.source, ip.destination, ip.ttl, ip.protocol
                );
                match transport {
                    TransportData::Icmp(icmp, rem) => println!(
                        "  ICMP type={} code={} ({} payload bytes)",
                        icmp.icmp_type,
                        icmp.code,
                        rem.len()
                    ),
                    TransportData::Tcp(tcp, rem) => println!(
                        "  TCP {} -> {} seq={} ack={} [{}] ({} payload bytes)",
                        tcp.source_port,
                        tcp.destination_port,
                        tcp.sequence,
                        tcp.acknowledgement,
                        tcp.flags,
                        rem.len()
                    ),
                    TransportData::Udp(udp, rem) => println!(
                        "  UDP {} -> {} len={} ({} payload bytes)",
                        udp.source_port,
                        udp.destination_port,
                        udp.length,
                        rem.len()
                    ),
                    TransportData::Opaque(rem) => {
                        println!("  unknown protocol ({} bytes)", rem.len())
                    }
                }
            }
            NetworkData::Opaque(_, rem) => println!("  non-IPv4 payload ({} bytes)", rem.len()),
        }
    }

    fn decode_error(&mut self, error: &LayerError) {
        eprintln!("  decode error: {}", error);
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: dump_frames <file.pcap>");
            exit(1);
        }
    };
    let file = File::open(&path).unwrap_or_else(|e| {
        eprintln!("{}: {}", path, e);
        exit(1);
    });
    let source = PcapReplaySource::new(65536, file).unwrap_or_else(|e| {
        eprintln!("{}: {}", path, e);
        exit(1);
    });
    match CaptureLoop::new(source).run(&mut Printer) {
        Ok(stats) => println!(
            "{} frames, {} decode errors",
            stats.frames, stats.decode_errors
        ),
        Err(e) => {
            eprintln!("capture failed: {}", e);
            exit(1);
        }
    }
}
