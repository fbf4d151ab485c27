use clap::{Arg, Command};
use lidar_data::{point_to_distance, SPOT_POSITION_MASK};
use std::io::Read;
use std::net::TcpStream;

fn get_server_addr() -> String {
    let matches = Command::new("Lidar frame receiver.")
        .about("Reads frames from the lidar bridge.")
        .disable_version_flag(true)
        .arg(
            Arg::new("addr")
                .help("The bridge address, e.g. localhost:5005")
                .use_value_delimiter(false)
                .required(true),
        )
        .get_matches();

    let addr: &String = matches.get_one("addr").unwrap();
    addr.to_string()
}

fn main() {
    let addr = get_server_addr();

    // One connection per frame; the bridge closes after each send.
    loop {
        let mut stream = match TcpStream::connect(&addr) {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        };
        let mut frame = Vec::new();
        if stream.read_to_end(&mut frame).is_err() {
            break;
        }

        let distances: Vec<f64> = frame
            .chunks_exact(4)
            .filter_map(|word| std::str::from_utf8(word).ok())
            .filter_map(|text| u16::from_str_radix(text, 16).ok())
            .map(|raw| point_to_distance(raw & SPOT_POSITION_MASK))
            .collect();

        for (angle, distance) in distances.iter().enumerate() {
            if *distance > 0.0 {
                println!("{angle:3}deg {distance:.3}m");
            }
        }
    }
}
