//! Simulated camera calibration and motion telemetry.
//!
//! A single-state machine: every tick increments a counter and updates a set
//! of scalar fields with fixed trigonometric functions of it. No randomness
//! and no external input; two simulators advanced through the same ticks hold
//! identical state. The values are presentation filler and deliberately only
//! plausible, not calibrated.

const BASE_FX: f64 = 1000.0;
const BASE_FY: f64 = 1000.0;
const BASE_CX: f64 = 640.0;
const BASE_CY: f64 = 480.0;
const BASE_K1: f64 = 0.1;
const BASE_K2: f64 = -0.2;
const BASE_P1: f64 = 0.01;
const BASE_P2: f64 = 0.01;
const BASE_K3: f64 = 0.05;
const BASE_DZ: f64 = 200.0;

/// Snapshot of the simulated state after some number of ticks.
///
/// Intrinsics in pixels, translation in millimeters, orientation in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    pub tick: u64,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Telemetry {
    fn baseline() -> Self {
        Self {
            tick: 0,
            fx: BASE_FX,
            fy: BASE_FY,
            cx: BASE_CX,
            cy: BASE_CY,
            k1: BASE_K1,
            k2: BASE_K2,
            p1: BASE_P1,
            p2: BASE_P2,
            k3: BASE_K3,
            dx: 0.0,
            dy: 0.0,
            dz: BASE_DZ,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Tick-driven telemetry generator.
///
/// The focal lengths and principal point drift (each tick adds a small
/// sinusoidal step), while the distortion coefficients and the 6-DOF motion
/// fields are recomputed from the tick count alone.
pub struct TelemetrySimulator {
    state: Telemetry,
}

impl TelemetrySimulator {
    pub fn new() -> Self {
        Self {
            state: Telemetry::baseline(),
        }
    }

    pub fn snapshot(&self) -> Telemetry {
        self.state
    }

    /// Advance one tick and return the updated state.
    pub fn tick(&mut self) -> Telemetry {
        let s = &mut self.state;
        s.tick += 1;
        let t = s.tick as f64;

        s.fx += (t * 0.05).sin() * 0.5;
        s.fy += (t * 0.05).cos() * 0.5;
        s.cx += (t * 0.03).sin() * 0.3;
        s.cy += (t * 0.03).cos() * 0.3;

        s.k1 = BASE_K1 + (t * 0.02).sin() * 0.02;
        s.k2 = BASE_K2 + (t * 0.02).cos() * 0.02;
        s.p1 = BASE_P1 + (t * 0.01).sin() * 0.005;
        s.p2 = BASE_P2 + (t * 0.01).cos() * 0.005;
        s.k3 = BASE_K3 + (t * 0.015).sin() * 0.01;

        s.dx = 100.0 * (t * 0.1).sin();
        s.dy = 50.0 * (t * 0.07).cos();
        s.dz = BASE_DZ + 30.0 * (t * 0.05).sin();

        s.roll = 5.0 * (t * 0.08).sin();
        s.pitch = 10.0 * (t * 0.06).cos();
        s.yaw = 15.0 * (t * 0.04).sin();

        self.state
    }
}

impl Default for TelemetrySimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_baseline() {
        let sim = TelemetrySimulator::new();
        let t = sim.snapshot();
        assert_eq!(t.tick, 0);
        assert_eq!(t.fx, 1000.0);
        assert_eq!(t.fy, 1000.0);
        assert_eq!(t.cx, 640.0);
        assert_eq!(t.cy, 480.0);
        assert_eq!(t.k1, 0.1);
        assert_eq!(t.k2, -0.2);
        assert_eq!(t.p1, 0.01);
        assert_eq!(t.p2, 0.01);
        assert_eq!(t.k3, 0.05);
        assert_eq!(t.dx, 0.0);
        assert_eq!(t.dy, 0.0);
        assert_eq!(t.dz, 200.0);
        assert_eq!(t.roll, 0.0);
        assert_eq!(t.pitch, 0.0);
        assert_eq!(t.yaw, 0.0);
    }

    #[test]
    fn first_tick_matches_formulas() {
        let mut sim = TelemetrySimulator::new();
        let t = sim.tick();
        assert_eq!(t.tick, 1);
        assert_eq!(t.fx, 1000.0 + 0.05_f64.sin() * 0.5);
        assert_eq!(t.fy, 1000.0 + 0.05_f64.cos() * 0.5);
        assert_eq!(t.k1, 0.1 + 0.02_f64.sin() * 0.02);
        assert_eq!(t.dx, 100.0 * 0.1_f64.sin());
        assert_eq!(t.dz, 200.0 + 30.0 * 0.05_f64.sin());
        assert_eq!(t.pitch, 10.0 * 0.06_f64.cos());
    }

    #[test]
    fn intrinsics_drift_while_motion_recomputes() {
        let mut sim = TelemetrySimulator::new();
        sim.tick();
        sim.tick();
        let t = sim.tick();
        // fx accumulates one step per tick.
        let expected_fx = 1000.0
            + (1.0_f64 * 0.05).sin() * 0.5
            + (2.0_f64 * 0.05).sin() * 0.5
            + (3.0_f64 * 0.05).sin() * 0.5;
        assert_eq!(t.fx, expected_fx);
        // dx depends on the current tick only.
        assert_eq!(t.dx, 100.0 * (3.0_f64 * 0.1).sin());
        assert_eq!(t.yaw, 15.0 * (3.0_f64 * 0.04).sin());
    }

    #[test]
    fn equal_tick_sequences_produce_identical_state() {
        let mut a = TelemetrySimulator::new();
        let mut b = TelemetrySimulator::new();
        for _ in 0..250 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn tick_counter_is_monotonic() {
        let mut sim = TelemetrySimulator::new();
        let mut last = 0;
        for _ in 0..10 {
            let t = sim.tick();
            assert_eq!(t.tick, last + 1);
            last = t.tick;
        }
    }
}
