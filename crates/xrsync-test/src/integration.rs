//! End-to-end tests across controller, wire format, link and remote user

use std::sync::Arc;

use xrsync_core::{Hand, UserScale, Vec3};
use xrsync_runtime::init_logging;
use xrsync_upload::{AssetFilter, InMemoryLibrary, UploadFile, UploadHandler, UploadOutcome};

use crate::{LinkConfig, Motion, SessionConfig, SessionSimulator};

fn walking() -> Motion {
    Motion::Linear(Vec3::new(1.2, 0.0, -0.5))
}

#[test]
fn test_remote_tracks_walking_user() {
    init_logging("xrsync=warn");
    let mut sim = SessionSimulator::new(SessionConfig::default(), walking());
    sim.run(600);

    assert_eq!(sim.decode_errors(), 0);
    assert!(sim.remote().is_immersive());
    assert!(sim.anchor_error().unwrap() < 1e-3);

    // Anchors at frames 0 and 300, velocity every frame
    assert_eq!(sim.controller().stats().anchors_sent, 2);
    assert_eq!(sim.controller().stats().payloads_sent, 600);
}

#[test]
fn test_remote_hands_follow_scene_presence() {
    let mut sim = SessionSimulator::new(SessionConfig::default(), Motion::Idle);
    sim.run(2);
    assert!(sim.remote().hand_pose(Hand::Left).is_some());

    let right = sim.remote().hand_world_position(Hand::Right).unwrap();
    assert!(right.distance(Vec3::new(0.25, 1.1, -0.3)) < 1e-5);

    sim.set_hand_in_scene(false, true);
    sim.run(1);
    assert!(sim.remote().hand_pose(Hand::Left).is_none());
    assert!(sim.remote().hand_pose(Hand::Right).is_some());
}

#[test]
fn test_idle_desktop_user_only_sends_anchors() {
    let config = SessionConfig {
        immersive: false,
        ..Default::default()
    };
    let mut sim = SessionSimulator::new(config, Motion::Idle);
    sim.run(601);

    let stats = sim.controller().stats();
    assert_eq!(stats.payloads_sent, 3);
    assert_eq!(stats.payloads_skipped, 598);
    assert!(!sim.remote().is_immersive());
    assert_eq!(sim.remote().anchor(), Some(Vec3::ZERO));
}

#[test]
fn test_scaled_user_avatar_height() {
    let config = SessionConfig {
        user_scale: UserScale::new(2.0).unwrap(),
        ..Default::default()
    };
    let mut sim = SessionSimulator::new(config, Motion::Idle);
    sim.run(2);

    let head = sim.remote().avatar_world_position().unwrap();
    assert!(head.distance(Vec3::new(0.0, 3.2, 0.0)) < 1e-5);
}

#[test]
fn test_drift_corrected_over_poor_link() {
    let config = SessionConfig {
        link: LinkConfig::poor(),
        seed: 42,
        ..Default::default()
    };
    let motion = Motion::Circle {
        radius: 3.0,
        angular_speed: 0.5,
    };
    let mut sim = SessionSimulator::new(config, motion);
    sim.run(1800);

    assert_eq!(sim.decode_errors(), 0);
    assert!(sim.link().stats().packets_lost > 0);
    assert!(sim.remote().anchor().is_some());

    // Latency and bursts cost accuracy, absolute anchors keep it bounded
    let error = sim.anchor_error().unwrap();
    assert!(error.is_finite());
    assert!(error < 10.0, "anchor error {}", error);
}

#[tokio::test]
async fn test_upload_batch_end_to_end() {
    let library = Arc::new(InMemoryLibrary::new());
    let handler = UploadHandler::new(Arc::clone(&library));
    handler.listen_for_assets(AssetFilter::Any, true).unwrap();

    let outcome = handler
        .receive(vec![
            UploadFile::new("floor.png", vec![1u8; 16]),
            UploadFile::new("chair.glb", vec![2u8; 64]),
            UploadFile::new("readme.md", vec![3u8; 8]),
        ])
        .await
        .unwrap();

    match outcome {
        UploadOutcome::Assets(ids) => assert_eq!(ids.len(), 2),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(library.len(), 2);

    handler.stop_listening();
    assert!(handler.listener().is_none());
}
