use crate::communication::messages::StreamEvent;
use amiquip::{
    Connection, Consumer, ConsumerMessage, ConsumerOptions, Error as AmiquipError,
    QueueDeclareOptions, Result as AmiquipResult,
};
use log::{debug, info};

// Consumes snapshot bodies from `queue_name` and forwards them, newest first.
//
// Blocking; run it under `spawn_blocking`. When several deliveries are already
// buffered only the newest is forwarded, the older ones are acked and dropped.
// There is no reconnect: any failure while opening the connection, channel,
// queue or consumer is reported as `ConnectError` and returned to the caller.
// Once `Connect` was sent, `Disconnect` always follows, even when an ack fails.
pub fn consume_snapshots<F>(url: &str, queue_name: &str, mut on_event: F) -> AmiquipResult<()>
where
    F: FnMut(StreamEvent),
{
    let mut connection =
        Connection::insecure_open(url).map_err(|e| connect_error(&mut on_event, e))?;
    let channel = connection
        .open_channel(None)
        .map_err(|e| connect_error(&mut on_event, e))?;
    let queue = channel
        .queue_declare(queue_name, QueueDeclareOptions::default())
        .map_err(|e| connect_error(&mut on_event, e))?;
    let consumer = queue
        .consume(ConsumerOptions::default())
        .map_err(|e| connect_error(&mut on_event, e))?;
    on_event(StreamEvent::Connect);

    let forwarded = forward_latest(&consumer, &mut on_event);
    on_event(StreamEvent::Disconnect);
    forwarded?;
    connection.close()
}

fn connect_error<F: FnMut(StreamEvent)>(on_event: &mut F, e: AmiquipError) -> AmiquipError {
    on_event(StreamEvent::ConnectError(e.to_string()));
    e
}

fn forward_latest<F>(consumer: &Consumer, on_event: &mut F) -> AmiquipResult<()>
where
    F: FnMut(StreamEvent),
{
    let receiver = consumer.receiver();
    let mut ended = false;
    while !ended {
        let mut delivery = match receiver.recv() {
            Ok(ConsumerMessage::Delivery(delivery)) => delivery,
            Ok(other) => {
                info!("Snapshot consumer ended: {:?}", other);
                break;
            }
            Err(_) => break,
        };

        let mut superseded = 0;
        loop {
            match receiver.try_recv() {
                Ok(ConsumerMessage::Delivery(newer)) => {
                    consumer.ack(delivery)?;
                    delivery = newer;
                    superseded += 1;
                }
                Ok(other) => {
                    info!("Snapshot consumer ended: {:?}", other);
                    ended = true;
                    break;
                }
                Err(_) => break,
            }
        }
        if superseded > 0 {
            debug!("Dropped {} stale snapshot(s) in favour of the newest", superseded);
        }

        on_event(StreamEvent::SimulationState(delivery.body.clone()));
        consumer.ack(delivery)?;
    }
    Ok(())
}
