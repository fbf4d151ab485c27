use crate::constants::{DEQUEUE_POLL_INTERVAL_MS, EXPECTED_PACKET_LENGTH};
use crate::encode::{encode_frame, Frame};
use crate::numeric::to_string;
use crate::packet::{rotation_duration_ms, status, strip_packet};
use crate::serial::PacketSource;
use crate::server::send_frame;
use crate::time::sleep_ms;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::io::ErrorKind;
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Struct that contains bridge threads.
pub struct BridgeThreads {
    pub(crate) ingest_terminator_tx: Sender<bool>,
    pub(crate) delivery_terminator_tx: Sender<bool>,
    pub(crate) ingest_thread: Option<JoinHandle<()>>,
    pub(crate) delivery_thread: Option<JoinHandle<()>>,
}

/// Reads packets from the sensor until terminated, publishing one encoded
/// frame per accepted packet. Malformed packets are logged and dropped; the
/// next iteration reads again. The source is released when the loop returns.
pub(crate) fn ingest_packets(
    mut source: Box<dyn PacketSource>,
    frame_tx: Sender<Frame>,
    terminator_rx: Receiver<bool>,
) {
    loop {
        if do_terminate(&terminator_rx) {
            return;
        }

        let packet = match source.read_packet() {
            Ok(packet) => packet,
            Err(e) => {
                warn!("Sensor read failed: {e}");
                continue;
            }
        };
        if packet.is_empty() {
            continue;
        }
        if packet.len() < EXPECTED_PACKET_LENGTH {
            warn!(
                "Packet from lidar is too small! Only got {} bytes. Data: {}",
                packet.len(),
                to_string(&packet)
            );
            continue;
        }

        let samples = match strip_packet(&packet) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Dropping packet: {e} Data: {}", to_string(&packet[..8]));
                continue;
            }
        };
        debug!(
            "Accepted packet: status = {:#06X}, last rotation took {} ms",
            status(&packet),
            rotation_duration_ms(&packet)
        );

        // The queue is unbounded; publishing never blocks on a slow client.
        if let Err(e) = frame_tx.send(encode_frame(samples)) {
            error!("{e}");
        }
    }
}

/// Accepts one client at a time and sends it exactly one frame, oldest
/// first, then closes the connection. A client that wants the next frame
/// reconnects. Frames lost to a failed send are not requeued.
pub(crate) fn deliver_frames(
    listener: TcpListener,
    frame_rx: Receiver<Frame>,
    terminator_rx: Receiver<bool>,
    accept_timeout_ms: u64,
) {
    loop {
        if do_terminate(&terminator_rx) {
            return;
        }

        let mut stream = match listener.accept() {
            Ok((stream, peer)) => {
                debug!("Accepted connection from {peer}");
                stream
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                sleep_ms(accept_timeout_ms);
                continue;
            }
            Err(e) => {
                warn!("Accept failed: {e}");
                continue;
            }
        };
        // The listener is non-blocking; the accepted stream must not be.
        if let Err(e) = stream.set_nonblocking(false) {
            warn!("{e}");
            continue;
        }
        if let Err(e) = stream.set_write_timeout(Some(Duration::from_millis(accept_timeout_ms))) {
            warn!("{e}");
        }

        // Block until the next frame is ready. This is the one unbounded
        // wait in the system; only the stop signal cuts it short.
        let frame = loop {
            if do_terminate(&terminator_rx) {
                return;
            }
            match frame_rx.recv_timeout(Duration::from_millis(DEQUEUE_POLL_INTERVAL_MS)) {
                Ok(frame) => break frame,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        };

        debug!("Sending {} bytes", frame.len());
        if let Err(e) = send_frame(&mut stream, &frame) {
            warn!("Send failed, frame dropped: {e}");
        }
        // The stream goes out of scope here: the connection is closed on
        // every path, including send failure.
    }
}

pub(crate) fn do_terminate(terminator_rx: &Receiver<bool>) -> bool {
    terminator_rx.try_recv().unwrap_or(false)
}

/// Function to join bridge threads.
/// This function is automatically called when `bridge_threads` is dropped.
pub fn join(bridge_threads: &mut BridgeThreads) {
    // A loop that already exited dropped its receiver; nothing to signal.
    let _ = bridge_threads.ingest_terminator_tx.send(true);
    let _ = bridge_threads.delivery_terminator_tx.send(true);

    if let Some(thread) = bridge_threads.ingest_thread.take() {
        if thread.join().is_err() {
            error!("Ingestion thread panicked");
        }
    }
    if let Some(thread) = bridge_threads.delivery_thread.take() {
        if thread.join().is_err() {
            error!("Delivery thread panicked");
        }
    }
}

impl Drop for BridgeThreads {
    fn drop(&mut self) {
        join(self);
    }
}
