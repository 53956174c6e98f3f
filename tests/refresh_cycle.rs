use mediacontrol::{
    backend::TransportAction,
    config::Config,
    controller::{Controller, Intent},
    error::ControlError,
    players::{PlaybackState, PlayerHandle},
    runner::{CommandOutput, CommandRunner},
};
use std::{
    cell::RefCell,
    collections::HashMap,
    time::{Duration, Instant},
};

/// Pretends to be playerctl/pactl. Answers by full command line.
#[derive(Default)]
struct FakeDesktop {
    replies: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeDesktop {
    fn set(&self, line: &str, stdout: &str) {
        self.replies
            .borrow_mut()
            .insert(line.to_string(), stdout.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeDesktop {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ControlError> {
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());
        let stdout = self.replies.borrow().get(&line).cloned().unwrap_or_default();
        Ok(CommandOutput {
            stdout,
            exit_code: 0,
        })
    }
}

fn quick_config() -> Config {
    let mut config = Config::default();
    config.refresh.initial_delay_ms = 0;
    config
}

/// Ticks with the clock frozen at `at`.
fn poll_at(controller: &mut Controller<FakeDesktop>, at: Instant) -> bool {
    controller.poll(at, || at)
}

#[test]
fn selection_follows_players_across_ticks() {
    let start = Instant::now();
    let mut controller = Controller::new(FakeDesktop::default(), &quick_config(), start);
    controller.runner().set("playerctl -l", "spotify\nfirefox\n");
    controller.runner().set("playerctl -p spotify status", "Playing");
    controller.runner().set(
        "pactl get-sink-volume @DEFAULT_SINK@",
        "Volume: front-left: 32768 /  50% / -18.06 dB",
    );

    assert!(poll_at(&mut controller, start));
    assert_eq!(
        controller.snapshot().selected,
        Some(PlayerHandle::from("spotify"))
    );
    assert_eq!(controller.snapshot().playback, PlaybackState::Playing);
    assert_eq!(controller.snapshot().volume.percent(), Some(50));

    // Not due yet.
    assert!(!poll_at(&mut controller, start + Duration::from_secs(1)));

    controller.runner().set("playerctl -l", "firefox\n");
    assert!(poll_at(&mut controller, start + Duration::from_secs(3)));
    assert_eq!(
        controller.snapshot().selected,
        Some(PlayerHandle::from("firefox"))
    );
    assert_eq!(controller.snapshot().playback, PlaybackState::Unknown);
}

#[test]
fn user_actions_reach_the_right_tools() {
    let start = Instant::now();
    let mut controller = Controller::new(FakeDesktop::default(), &quick_config(), start);
    controller.runner().set("playerctl -l", "mpv\n");
    poll_at(&mut controller, start);

    controller.handle(Intent::Transport(TransportAction::SeekForward(
        controller.seek_seconds(),
    )));
    controller.handle(Intent::SetVolume(150));
    controller.handle(Intent::ToggleMute);

    let calls = controller.runner().calls();
    assert!(calls.contains(&"playerctl -p mpv position 10+".to_string()));
    assert!(calls.contains(&"pactl set-sink-volume @DEFAULT_SINK@ 100%".to_string()));
    assert!(calls.contains(&"pactl set-sink-mute @DEFAULT_SINK@ toggle".to_string()));
}

#[test]
fn shutdown_stops_all_work() {
    let start = Instant::now();
    let mut controller = Controller::new(FakeDesktop::default(), &quick_config(), start);
    poll_at(&mut controller, start);
    let before = controller.runner().calls().len();

    controller.shutdown();
    assert!(controller.is_shut_down());
    assert!(!poll_at(&mut controller, start + Duration::from_secs(60)));
    controller.handle(Intent::AdjustVolume(5));
    assert_eq!(controller.runner().calls().len(), before);
}
