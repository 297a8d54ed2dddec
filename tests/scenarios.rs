use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};

use contraption::gfx::lighting::DISABLED_MARKER_COLOR;
use contraption::gfx::material::hex_to_rgb;
use contraption::gfx::scene::{keys, BallPhase, DominoPhase, MotionState, NodeId};
use contraption::{FrameDriver, SceneConfig, SceneError};

fn driver() -> FrameDriver {
    contraption::default().unwrap()
}

fn id(driver: &FrameDriver, name: &str) -> NodeId {
    driver
        .scene()
        .find_by_name(name)
        .unwrap_or_else(|| panic!("no node named {}", name))
}

fn position(driver: &FrameDriver, name: &str) -> Vector3<f32> {
    driver.scene().node(id(driver, name)).unwrap().transform.position
}

fn focus(driver: &FrameDriver) -> Option<NodeId> {
    driver.simulation().unwrap().context().unwrap().focus()
}

fn run(driver: &mut FrameDriver, ticks: u32) {
    for _ in 0..ticks {
        assert!(driver.tick());
    }
}

#[test]
fn ball_waits_then_rolls_down_the_ramp() {
    let mut driver = driver();
    let ball = id(&driver, "ball_1");

    // 132 steps cover 2.2s; the release happens on the first step after 2.21s
    run(&mut driver, 132);
    let node = driver.scene().node(ball).unwrap();
    assert_eq!(node.ball_phase(), Some(BallPhase::Waiting));
    assert_eq!(node.transform.position, Vector3::new(18.0, 5.2, 0.0));

    run(&mut driver, 8);
    assert_eq!(driver.scene().node(ball).unwrap().ball_phase(), Some(BallPhase::OnRamp));

    let mut previous = position(&driver, "ball_1").x;
    assert!(previous < 18.0);
    for _ in 0..5 {
        run(&mut driver, 1);
        let x = position(&driver, "ball_1").x;
        assert!(x < previous);
        previous = x;
    }
}

#[test]
fn ball_eventually_leaves_the_ramp() {
    let mut driver = driver();
    run(&mut driver, 600);
    let phase = driver.scene().node(id(&driver, "ball_1")).unwrap().ball_phase();
    assert!(matches!(phase, Some(BallPhase::InAir) | Some(BallPhase::OnGround)));
}

#[test]
fn struck_domino_topples_and_turns_green() {
    let mut driver = driver();
    let target = id(&driver, "ball_2");
    let domino = id(&driver, "domino");
    let slab = id(&driver, "domino_slab");

    {
        let node = driver.scene_mut().node_mut(target).unwrap();
        node.transform.position = Vector3::new(28.5, -81.0, 24.507_275);
        node.velocity = Vector3::new(5.0, 0.0, 0.0);
    }

    run(&mut driver, 1);
    let scene = driver.scene();
    assert_eq!(scene.node(domino).unwrap().domino_phase(), Some(DominoPhase::Toppling));
    assert_eq!(scene.node(target).unwrap().velocity, Vector3::new(0.0, 0.0, 0.0));

    run(&mut driver, 120);
    let scene = driver.scene();
    let node = scene.node(domino).unwrap();
    assert_eq!(node.domino_phase(), Some(DominoPhase::Fallen));
    assert!((node.data.scalar(keys::ANGLE).unwrap() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    let color = scene.node(slab).unwrap().material.as_ref().unwrap().color;
    assert_eq!(color, hex_to_rgb(0x00FF00));
}

#[test]
fn reset_restores_initial_scene() {
    let mut driver = driver();
    let ball = id(&driver, "ball_1");
    let target = id(&driver, "ball_2");
    let disc = id(&driver, "disc");

    driver.scene_mut().node_mut(target).unwrap().velocity = Vector3::new(3.0, 0.0, 0.0);
    run(&mut driver, 300);
    assert!(driver.simulated_time() > 4.9);

    driver.reset();
    assert_eq!(driver.ticks(), 0);
    assert_eq!(driver.simulated_time(), 0.0);

    let scene = driver.scene();
    let node = scene.node(ball).unwrap();
    assert_eq!(node.ball_phase(), Some(BallPhase::Waiting));
    assert_eq!(node.transform.position, Vector3::new(18.0, 5.2, 0.0));
    assert_eq!(node.velocity, Vector3::new(0.0, 0.0, 0.0));

    let node = scene.node(target).unwrap();
    assert_eq!(node.transform.position, Vector3::new(-30.0, -81.0, 24.507_275));
    assert_eq!(node.velocity, Vector3::new(0.0, 0.0, 0.0));

    assert_eq!(scene.node(disc).unwrap().data.scalar(keys::ANGLE), Some(0.0));
    assert_eq!(
        scene.node(id(&driver, "domino")).unwrap().domino_phase(),
        Some(DominoPhase::Standing)
    );

    // The tracking spot is back above the first ball
    let marker = scene.world_position(id(&driver, "light_marker_2")).unwrap();
    assert!((marker - Vector3::new(18.0, 25.2, 0.0)).magnitude() < 1e-4);
}

#[test]
fn advance_runs_fixed_steps_up_to_the_cap() {
    let mut driver = driver();
    assert_eq!(driver.advance(0.5), 8);

    driver.reset();
    driver.set_max_substeps(100);
    assert_eq!(driver.advance(0.5), 30);
    assert!((driver.simulated_time() - 0.5).abs() < 1e-4);
    assert!((driver.simulated_time() - driver.ticks() as f32 / 60.0).abs() < 1e-5);
}

#[test]
fn toggled_light_dims_its_marker() {
    let mut driver = driver();
    let marker = id(&driver, "light_marker_1");

    assert_eq!(driver.toggle_light(1), Ok(false));
    let color = driver.scene().node(marker).unwrap().material.as_ref().unwrap().color;
    assert_eq!(color, hex_to_rgb(DISABLED_MARKER_COLOR));
    let frame = driver.shading_frame(&Matrix4::identity());
    assert_eq!(frame.lights[1].params[0], 0.0);

    assert_eq!(driver.toggle_light(1), Ok(true));
    let color = driver.scene().node(marker).unwrap().material.as_ref().unwrap().color;
    assert_eq!(color, hex_to_rgb(0xFF0000));

    assert_eq!(
        driver.toggle_light(7),
        Err(SceneError::InvalidLightIndex { index: 7, count: 3 })
    );
}

#[test]
fn shading_frame_covers_every_drawable_node() {
    let mut driver = driver();
    run(&mut driver, 10);
    let frame = driver.shading_frame(&Matrix4::identity());

    // Everything but the root, the swing pivot and the domino pivot carries a mesh
    assert_eq!(frame.objects.len(), driver.scene().len() - 3);
    assert_eq!(frame.objects.len(), frame.nodes.len());
    assert_eq!(frame.object_bytes().len(), frame.objects.len() * 96);
}

#[test]
fn custom_start_delay_is_honored() {
    let mut config = SceneConfig::default();
    config.rolling_ball.start_delay = 0.0;
    let mut driver = contraption::launch(config).unwrap();
    run(&mut driver, 2);
    let phase = driver.scene().node(id(&driver, "ball_1")).unwrap().ball_phase();
    assert_eq!(phase, Some(BallPhase::OnRamp));
}

#[test]
fn struck_ball_takes_focus_and_topples_the_domino() {
    let mut driver = driver();
    let ball = id(&driver, "ball_1");
    let target = id(&driver, "ball_2");
    let domino = id(&driver, "domino");
    assert_eq!(focus(&driver), Some(ball));

    {
        let node = driver.scene_mut().node_mut(ball).unwrap();
        assert!(node.transition(MotionState::Ball(BallPhase::OnGround)));
        node.transform.position = Vector3::new(-32.9, -81.0, 24.507_275);
        node.velocity = Vector3::new(30.0, 0.0, 0.0);
    }

    run(&mut driver, 1);
    assert_eq!(focus(&driver), Some(target));
    // Masses 1 and 2: the striker bounces back at -10, the target leaves at 20
    let scene = driver.scene();
    assert!((scene.node(ball).unwrap().velocity.x + 10.0).abs() < 1e-4);
    assert!((scene.node(target).unwrap().velocity.x - 20.0).abs() < 1e-4);

    run(&mut driver, 240);
    let phase = driver.scene().node(domino).unwrap().domino_phase();
    assert!(matches!(phase, Some(DominoPhase::Toppling) | Some(DominoPhase::Fallen)));
    assert_eq!(focus(&driver), Some(target));

    driver.reset();
    assert_eq!(focus(&driver), Some(ball));
    let marker = driver.scene().world_position(id(&driver, "light_marker_2")).unwrap();
    assert!((marker - Vector3::new(18.0, 25.2, 0.0)).magnitude() < 1e-4);
}

#[test]
fn default_run_passes_wide_of_the_second_ball() {
    let mut driver = driver();
    let ball = id(&driver, "ball_1");
    let target = id(&driver, "ball_2");

    run(&mut driver, 900);
    let scene = driver.scene();
    let node = scene.node(target).unwrap();
    assert_eq!(node.velocity, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(node.transform.position, Vector3::new(-30.0, -81.0, 24.507_275));
    assert_eq!(
        scene.node(id(&driver, "domino")).unwrap().domino_phase(),
        Some(DominoPhase::Standing)
    );
    assert_eq!(focus(&driver), Some(ball));
}
