// benches/bench_vehicle_queue.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use junction_sim::simulation_engine::queue::VehicleQueue;
use junction_sim::simulation_engine::roads::RoadId;
use junction_sim::simulation_engine::vehicles::{Vehicle, VehicleId};
use std::time::Duration;

fn vehicle(n: usize) -> Vehicle {
    Vehicle::new(VehicleId::new(&format!("V{n}")).unwrap(), RoadId::A)
}

// Fill a queue to capacity and drain it again.
fn bench_fill_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("vehicle_queue_fill_drain");
    group.measurement_time(Duration::from_secs(5));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &capacity in [10, 15, 100].iter() {
        let vehicles: Vec<Vehicle> = (0..capacity).map(vehicle).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let queue = VehicleQueue::new(capacity);
                b.iter(|| {
                    for v in &vehicles {
                        let _ = queue.enqueue(v.clone());
                    }
                    while let Some(v) = queue.try_dequeue() {
                        black_box(v);
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fill_and_drain);
criterion_main!(benches);
