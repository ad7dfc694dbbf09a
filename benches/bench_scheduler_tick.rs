// benches/bench_scheduler_tick.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use junction_sim::control_system::traffic_light_controller::Signal;
use junction_sim::simulation_engine::junction::Junction;
use junction_sim::simulation_engine::roads::RoadId;
use junction_sim::simulation_engine::route_generation::RoutingTable;
use junction_sim::simulation_engine::scheduler::IntersectionScheduler;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

// Refill road A, tick once with road A green, then let every released vehicle finish.
fn bench_scheduler_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_tick");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &max_active in [1usize, 3, 10].iter() {
        let junction = Arc::new(Junction::new(10).unwrap());
        let scheduler =
            IntersectionScheduler::new(Arc::clone(&junction), RoutingTable::new(), max_active);
        let mut rng = SmallRng::seed_from_u64(7);

        group.bench_with_input(
            BenchmarkId::from_parameter(max_active),
            &max_active,
            |b, _| {
                b.iter(|| {
                    for lane in 0..3 {
                        let _ = junction.ingest_into_lane(RoadId::A, lane, "BENCH1");
                    }
                    let released = scheduler.tick_with_rng(Signal::Green(RoadId::A), &mut rng);
                    for release in &released {
                        scheduler.complete(&release.vehicle);
                    }
                    black_box(released);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_scheduler_tick);
criterion_main!(benches);
