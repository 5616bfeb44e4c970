//! The run/pause/halt state machine that drives a [`Machine`] at a fixed
//! pace: a configurable number of instructions per second, timers at
//! 60 Hz, one framebuffer hand-off per tick.

use std::time::{Duration, Instant};

use crate::emulator::config::Config;
use crate::emulator::input::{ControlEvent, EventSource};
use crate::emulator::machine::Machine;
use crate::emulator::output::Renderer;

/// 60 Hz tick budget.
const TICK_BUDGET: Duration = Duration::from_nanos(1_000_000_000 / 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    /// Terminal: quit request or unrecoverable machine fault.
    Halted,
}

pub struct Controller<E: EventSource, R: Renderer> {
    machine: Machine,
    config: Config,
    state: RunState,
    events: E,
    renderer: R,
    pending: Vec<ControlEvent>,
}

impl<E: EventSource, R: Renderer> Controller<E, R> {
    pub fn new(machine: Machine, config: Config, events: E, renderer: R) -> Controller<E, R> {
        Controller {
            machine,
            config,
            state: RunState::Running,
            events,
            renderer,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// One controller tick: drain input, then (while running) execute a
    /// batch of cycles, step the timers once and hand the framebuffer to
    /// the renderer. While paused only input is drained, so memory,
    /// registers and both timers stay frozen.
    pub fn tick(&mut self) {
        self.events.poll(&mut self.pending);
        for event in self.pending.drain(..) {
            match event {
                ControlEvent::KeyDown(key) => self.machine.key_down(key),
                ControlEvent::KeyUp(key) => self.machine.key_up(key),
                ControlEvent::TogglePause => {
                    self.state = match self.state {
                        RunState::Running => {
                            log::info!("paused");
                            RunState::Paused
                        }
                        RunState::Paused => {
                            log::info!("resumed");
                            RunState::Running
                        }
                        RunState::Halted => RunState::Halted,
                    };
                }
                ControlEvent::Quit => {
                    log::info!("quit requested");
                    self.state = RunState::Halted;
                }
            }
        }

        if self.state != RunState::Running {
            return;
        }

        for _ in 0..self.config.cycles_per_tick() {
            if let Err(fault) = self.machine.cycle() {
                log::error!("machine fault, halting: {}", fault);
                self.state = RunState::Halted;
                return;
            }
        }

        self.machine.tick_timers();
        self.renderer.present(self.machine.framebuffer(), &self.config);
        self.renderer.tone(self.machine.sound_active());
    }

    /// Run until halted, pacing each tick against the 60 Hz budget.
    ///
    /// The batch's wall-clock time is measured and the remainder of the
    /// budget slept off; if a tick overran, the sleep clamps to zero and
    /// the next tick starts immediately. There is no catch-up burst, so
    /// an overrun never inflates the instruction rate.
    pub fn run(&mut self) {
        while self.state != RunState::Halted {
            let start = Instant::now();
            self.tick();
            let elapsed = start.elapsed();
            if elapsed < TICK_BUDGET {
                spin_sleep::sleep(TICK_BUDGET - elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::output::NullRenderer;
    use std::collections::VecDeque;

    /// An event source that replays one scripted batch per poll.
    struct ScriptedEvents {
        batches: VecDeque<Vec<ControlEvent>>,
    }

    impl ScriptedEvents {
        fn new(batches: Vec<Vec<ControlEvent>>) -> ScriptedEvents {
            ScriptedEvents {
                batches: batches.into_iter().collect(),
            }
        }
    }

    impl EventSource for ScriptedEvents {
        fn poll(&mut self, events: &mut Vec<ControlEvent>) {
            if let Some(batch) = self.batches.pop_front() {
                events.extend(batch);
            }
        }
    }

    fn controller_with(
        program: &[u8],
        batches: Vec<Vec<ControlEvent>>,
    ) -> Controller<ScriptedEvents, NullRenderer> {
        let mut machine = Machine::new();
        machine.load(program).unwrap();
        let config = Config {
            instructions_per_second: 60, // one cycle per tick
            ..Config::default()
        };
        Controller::new(machine, config, ScriptedEvents::new(batches), NullRenderer)
    }

    // 1NNN to self: an idle loop that never faults.
    const IDLE_LOOP: [u8; 2] = [0x12, 0x00];

    #[test]
    fn starts_running() {
        let controller = controller_with(&IDLE_LOOP, vec![]);
        assert_eq!(controller.state(), RunState::Running);
    }

    #[test]
    fn quit_halts_terminally() {
        let mut controller = controller_with(
            &IDLE_LOOP,
            vec![vec![ControlEvent::Quit], vec![ControlEvent::TogglePause]],
        );
        controller.tick();
        assert_eq!(controller.state(), RunState::Halted);
        // Halted is terminal; pause cannot leave it.
        controller.tick();
        assert_eq!(controller.state(), RunState::Halted);
    }

    #[test]
    fn pause_freezes_the_machine() {
        // Set the delay timer to 9, then pause.
        let mut controller = controller_with(
            &[0x60, 0x09, 0xF0, 0x15, 0x12, 0x04],
            vec![vec![], vec![], vec![ControlEvent::TogglePause]],
        );
        controller.tick(); // 6009
        controller.tick(); // F015, then timer tick: 9 -> 8
        assert_eq!(controller.machine().delay_timer(), 8);

        controller.tick(); // pause takes effect before any cycle
        let pc = controller.machine().pc();
        for _ in 0..10 {
            controller.tick();
        }
        assert_eq!(controller.state(), RunState::Paused);
        assert_eq!(controller.machine().pc(), pc);
        assert_eq!(controller.machine().delay_timer(), 8);
        assert_eq!(controller.machine().register(0), 9);
    }

    #[test]
    fn resume_continues_from_the_same_pc() {
        let mut controller = controller_with(
            &IDLE_LOOP,
            vec![
                vec![ControlEvent::TogglePause],
                vec![],
                vec![ControlEvent::TogglePause],
            ],
        );
        controller.tick();
        assert_eq!(controller.state(), RunState::Paused);
        let pc = controller.machine().pc();
        controller.tick();
        assert_eq!(controller.machine().pc(), pc);

        controller.tick(); // resume + one cycle of the idle loop
        assert_eq!(controller.state(), RunState::Running);
        assert_eq!(controller.machine().pc(), 0x200);
    }

    #[test]
    fn key_events_reach_the_latch() {
        // FX0A at 0x200: waits until a key arrives, then stores it.
        let mut controller = controller_with(
            &[0xF3, 0x0A, 0x12, 0x02],
            vec![vec![], vec![ControlEvent::KeyDown(0x9)]],
        );
        controller.tick();
        assert_eq!(controller.machine().pc(), 0x200); // still waiting
        controller.tick();
        assert_eq!(controller.machine().register(3), 0x9);
    }

    #[test]
    fn machine_fault_halts_with_diagnostic() {
        // 2NNN calling itself overflows the 12-entry stack.
        let mut controller = controller_with(&[0x22, 0x00], vec![]);
        for _ in 0..13 {
            controller.tick();
            if controller.state() == RunState::Halted {
                break;
            }
        }
        assert_eq!(controller.state(), RunState::Halted);
    }

    #[test]
    fn timers_tick_once_per_tick_not_per_cycle() {
        let mut machine = Machine::new();
        // Set delay to 0xFF then spin.
        machine.load(&[0x60, 0xFF, 0xF0, 0x15, 0x12, 0x04]).unwrap();
        let config = Config {
            instructions_per_second: 600, // ten cycles per tick
            ..Config::default()
        };
        let mut controller =
            Controller::new(machine, config, ScriptedEvents::new(vec![]), NullRenderer);
        controller.tick();
        // Ten cycles ran but the timer only dropped by one.
        assert_eq!(controller.machine().delay_timer(), 0xFE);
    }
}
