use junction_sim::simulation_engine::junction::Junction;
use junction_sim::simulation_engine::lanes::LaneId;
use junction_sim::simulation_engine::queue::BoundedQueue;
use junction_sim::simulation_engine::roads::RoadId;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Consumers block on all three lanes of road A before any producer runs;
/// each must wake with exactly the vehicles sent to its lane, in order.
#[test]
fn blocked_consumers_on_every_lane_receive_their_vehicles() {
    let junction = Arc::new(Junction::new(4).unwrap());
    let per_lane = 20;

    let consumers: Vec<_> = (0..3)
        .map(|lane| {
            let junction = Arc::clone(&junction);
            thread::spawn(move || {
                let lane = junction.lane(LaneId::new(0, lane)).unwrap();
                (0..per_lane)
                    .map(|_| lane.queue.dequeue().expect("queue open"))
                    .map(|vehicle| vehicle.id.to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    thread::sleep(Duration::from_millis(50));

    let producers: Vec<_> = (0..3)
        .map(|lane| {
            let junction = Arc::clone(&junction);
            thread::spawn(move || {
                for n in 0..per_lane {
                    let id = format!("L{lane}N{n}");
                    // Queue capacity is 4, so back off while the consumer catches up.
                    while junction.ingest_into_lane(RoadId::A, lane, &id).is_err() {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    for (lane, consumer) in consumers.into_iter().enumerate() {
        let received = consumer.join().unwrap();
        let expected: Vec<String> = (0..per_lane).map(|n| format!("L{lane}N{n}")).collect();
        assert_eq!(received, expected);
    }
    assert_eq!(junction.queued(), 0);
}

#[test]
fn many_producers_one_consumer_never_lose_or_duplicate() {
    let queue = Arc::new(BoundedQueue::new(10));
    let producers = 4;
    let per_producer = 250;

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut seen = Vec::new();
            while let Some(value) = queue.dequeue() {
                assert!(queue.len() <= queue.capacity());
                seen.push(value);
            }
            seen
        })
    };

    let handles: Vec<_> = (0..producers)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for n in 0..per_producer {
                    let mut value = p * per_producer + n;
                    loop {
                        match queue.enqueue(value) {
                            Ok(()) => break,
                            Err(err) => {
                                value = err.into_inner();
                                thread::yield_now();
                            }
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    queue.close();

    let mut seen = consumer.join().unwrap();
    // Each producer's values arrive in the order it sent them.
    for p in 0..producers {
        let from_p: Vec<_> = seen
            .iter()
            .copied()
            .filter(|v| v / per_producer == p)
            .collect();
        assert!(from_p.windows(2).all(|w| w[0] < w[1]));
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..producers * per_producer).collect::<Vec<_>>());
}

#[test]
fn closing_the_junction_releases_blocked_consumers() {
    let junction = Arc::new(Junction::new(2).unwrap());
    let waiters: Vec<_> = junction
        .lanes()
        .map(|lane| lane.id)
        .map(|id| {
            let junction = Arc::clone(&junction);
            thread::spawn(move || junction.lane(id).and_then(|lane| lane.queue.dequeue()))
        })
        .collect();
    thread::sleep(Duration::from_millis(50));
    junction.close();
    for waiter in waiters {
        assert!(waiter.join().unwrap().is_none());
    }
}
