// Junction layout
pub const MAX_ROADS: usize = 4;
pub const LANES_PER_ROAD: usize = 3;

// Lane queues hold this many vehicles unless the config says otherwise.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

// Vehicles allowed inside the intersection at the same time.
pub const DEFAULT_MAX_ACTIVE_VEHICLES: usize = 10;

// Vehicle ids are plate-like strings such as "AB1CD234".
pub const MAX_VEHICLE_ID_LEN: usize = 8;

// Light cycle: road A, then road C, each green for 5 seconds.
pub const DEFAULT_LIGHT_PHASES: [char; 2] = ['A', 'C'];
pub const DEFAULT_GREEN_DURATION_SECS: u64 = 5;

// Task timings
pub const DEFAULT_TICK_MILLIS: u64 = 100;
pub const DEFAULT_CROSSING_MILLIS: u64 = 2000;
pub const DEFAULT_INTAKE_POLL_MILLIS: u64 = 2000;

// Files
pub const DEFAULT_CONFIG_FILE: &str = "junction.toml";
pub const DEFAULT_VEHICLE_FILE: &str = "vehicles.data";
pub const DEFAULT_RELEASE_LOG: &str = "releases.csv";
