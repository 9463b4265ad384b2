// cargo test -p sequence-player --test player_test

use crossbeam::channel::{Receiver, Sender, unbounded};
use sequence_player::{BackendEvent, MediaBackend, PlayerEvent, SequencePlayer};
use timeline::Clip;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String),
    Play,
    Pause,
    Stop,
    Seek(u64),
    Volume(f32),
}

/// Records every call and lets the test feed backend events in.
struct FakeBackend {
    calls: Sender<Call>,
    events_rx: Receiver<BackendEvent>,
    position: u64,
    duration: u64,
}

fn fake_backend() -> (FakeBackend, Receiver<Call>, Sender<BackendEvent>) {
    let (calls_tx, calls_rx) = unbounded();
    let (events_tx, events_rx) = unbounded();
    let backend = FakeBackend {
        calls: calls_tx,
        events_rx,
        position: 0,
        duration: 0,
    };
    (backend, calls_rx, events_tx)
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, path: &str) {
        let _ = self.calls.send(Call::Load(path.to_string()));
    }
    fn play(&mut self) {
        let _ = self.calls.send(Call::Play);
    }
    fn pause(&mut self) {
        let _ = self.calls.send(Call::Pause);
    }
    fn stop(&mut self) {
        let _ = self.calls.send(Call::Stop);
    }
    fn seek_ms(&mut self, ms: u64) {
        self.position = ms;
        let _ = self.calls.send(Call::Seek(ms));
    }
    fn set_volume(&mut self, volume: f32) {
        let _ = self.calls.send(Call::Volume(volume));
    }
    fn position_ms(&self) -> u64 {
        self.position
    }
    fn duration_ms(&self) -> u64 {
        self.duration
    }
    fn events(&self) -> Receiver<BackendEvent> {
        self.events_rx.clone()
    }
}

/// Two clips: `a.mp4` untrimmed 5s, `b.mp4` trimmed to 2s..5s (3s).
fn two_clips() -> Vec<Clip> {
    vec![
        Clip::new("a.mp4").with_out_s(5.0).with_duration_s(5.0),
        Clip::new("b.mp4")
            .with_in_s(2.0)
            .with_out_s(5.0)
            .with_duration_s(3.0),
    ]
}

fn drain(calls: &Receiver<Call>) -> Vec<Call> {
    calls.try_iter().collect()
}

#[test]
fn test_rebuild_publishes_total_duration() {
    let (backend, _calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    let player_events = player.subscribe();

    player.rebuild(&two_clips());
    assert_eq!(player.total_ms(), 8000);
    assert_eq!(
        player_events.try_recv(),
        Ok(PlayerEvent::DurationChanged(8000))
    );
}

#[test]
fn test_rebuild_to_empty_resets() {
    let (backend, _calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(1000);
    assert_eq!(player.current_clip(), Some(0));

    let player_events = player.subscribe();
    player.rebuild(&[]);
    assert_eq!(player.total_ms(), 0);
    assert_eq!(player.current_clip(), None);
    assert_eq!(player_events.try_recv(), Ok(PlayerEvent::DurationChanged(0)));
    assert_eq!(player_events.try_recv(), Ok(PlayerEvent::PositionChanged(0)));
}

#[test]
fn test_seek_loads_owning_clip_and_offsets_into_source() {
    let (backend, calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());

    // 6.0s global = 1.0s into clip 1, which starts at 2.0s in its file.
    player.seek_ms(6000);
    assert_eq!(
        drain(&calls),
        vec![Call::Load("b.mp4".to_string()), Call::Seek(3000)]
    );
    assert_eq!(player.current_clip(), Some(1));
}

#[test]
fn test_seek_within_loaded_clip_skips_reload() {
    let (backend, calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());

    player.seek_ms(1000);
    player.seek_ms(2500);
    assert_eq!(
        drain(&calls),
        vec![
            Call::Load("a.mp4".to_string()),
            Call::Seek(1000),
            Call::Seek(2500),
        ]
    );
}

#[test]
fn test_seek_clamps_to_total() {
    let (backend, calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    let player_events = player.subscribe();
    player.rebuild(&two_clips());

    player.seek_ms(99_000);
    // Clamped to 8000 = end of clip 1 = 3000ms past its 2000ms in-point.
    assert_eq!(
        drain(&calls),
        vec![Call::Load("b.mp4".to_string()), Call::Seek(5000)]
    );

    let positions: Vec<_> = player_events
        .try_iter()
        .filter(|e| matches!(e, PlayerEvent::PositionChanged(_)))
        .collect();
    assert_eq!(positions, vec![PlayerEvent::PositionChanged(8000)]);
}

#[test]
fn test_seek_on_empty_sequence_reports_zero() {
    let (backend, calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    let player_events = player.subscribe();

    player.seek_ms(5000);
    assert!(drain(&calls).is_empty());
    assert_eq!(player_events.try_recv(), Ok(PlayerEvent::PositionChanged(0)));
}

#[test]
fn test_backend_positions_are_globalized() {
    let (backend, _calls, events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(6000);

    let player_events = player.subscribe();
    // Backend reports 2.5s into b.mp4's file = 0.5s into the clip.
    events.send(BackendEvent::PositionChanged(2500)).unwrap();
    player.pump_events();
    assert_eq!(
        player_events.try_recv(),
        Ok(PlayerEvent::PositionChanged(5500))
    );
}

#[test]
fn test_stale_positions_from_outgoing_clip_are_dropped() {
    let (backend, _calls, events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(0);

    // A position for a.mp4 is still queued when the switch to b.mp4
    // happens; it must not surface as a position inside b.mp4.
    events.send(BackendEvent::PositionChanged(4900)).unwrap();
    let player_events = player.subscribe();
    player.seek_ms(6000);
    player.pump_events();

    let positions: Vec<_> = player_events
        .try_iter()
        .filter(|e| matches!(e, PlayerEvent::PositionChanged(_)))
        .collect();
    assert_eq!(positions, vec![PlayerEvent::PositionChanged(6000)]);
}

#[test]
fn test_auto_advance_crosses_clip_boundary() {
    let (backend, calls, events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(0);
    drain(&calls);

    // 4999ms into a.mp4: within the advance margin of the 5000ms edge.
    events.send(BackendEvent::PositionChanged(4999)).unwrap();
    player.pump_events();

    assert_eq!(player.current_clip(), Some(1));
    assert_eq!(
        drain(&calls),
        vec![Call::Load("b.mp4".to_string()), Call::Seek(2000)]
    );
}

#[test]
fn test_auto_advance_pauses_at_sequence_end() {
    let (backend, calls, events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(6000);
    drain(&calls);

    // 4999ms into b.mp4's file = 2999ms into the clip = 7999ms global.
    events.send(BackendEvent::PositionChanged(4999)).unwrap();
    player.pump_events();

    assert_eq!(drain(&calls), vec![Call::Pause]);
    assert_eq!(player.current_clip(), Some(1));
}

#[test]
fn test_backend_error_pauses_and_surfaces() {
    let (backend, calls, events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(1000);
    drain(&calls);
    let player_events = player.subscribe();

    events
        .send(BackendEvent::Error("file not found".to_string()))
        .unwrap();
    player.pump_events();

    assert_eq!(drain(&calls), vec![Call::Pause]);
    assert_eq!(
        player_events.try_recv(),
        Ok(PlayerEvent::Error("file not found".to_string()))
    );
    // Still parked on the same clip.
    assert_eq!(player.current_clip(), Some(0));
}

#[test]
fn test_position_estimate_is_clamped_to_clip_end() {
    let (backend, _calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    assert_eq!(player.position_ms(), 0);

    player.seek_ms(6000);
    // Backend sits at 2500ms in b.mp4's file; global = 5000 + 2500.
    player.backend_mut().position = 2500;
    assert_eq!(player.position_ms(), 7500);

    // A runaway backend position never escapes the clip's global end.
    player.backend_mut().position = 60_000;
    assert_eq!(player.position_ms(), 8000);
}

#[test]
fn test_transport_passthrough_and_stop_rewinds() {
    let (backend, calls, _events) = fake_backend();
    let mut player = SequencePlayer::new(backend);
    player.rebuild(&two_clips());
    player.seek_ms(6000);
    drain(&calls);

    player.play();
    player.pause();
    player.set_volume(0.5);
    player.stop();

    let made = drain(&calls);
    assert_eq!(made[0], Call::Play);
    assert_eq!(made[1], Call::Pause);
    assert_eq!(made[2], Call::Volume(0.5));
    assert_eq!(made[3], Call::Stop);
    // stop() rewinds to global zero, which reloads clip 0.
    assert!(made.contains(&Call::Load("a.mp4".to_string())));
    assert_eq!(player.current_clip(), Some(0));
}
