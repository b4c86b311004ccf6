use datapath::cpu::RunState;
use datapath::{
    render_svg, AnimEvent, AnimationConfig, Component, Config, Datapath, Easing, Layout, Player, Word16,
};

/// Drive a datapath through a player the way the front ends do.
fn animate(dp: &mut Datapath, config: &Config, clock_step_ms: u64) -> Vec<String> {
    let steps = dp.start().expect("start failed").len();
    let mut player = Player::new(steps, config.animation);
    let mut statuses = Vec::new();
    let mut now = 0;

    while !player.is_finished() {
        for event in player.advance(now) {
            match event {
                AnimEvent::Highlight(i) => {
                    dp.highlight_step(i, &config.layout).expect("highlight failed");
                    statuses.push(dp.status.clone());
                }
                AnimEvent::Redraw(i) => dp.redraw_arrow(i, &config.layout).expect("redraw failed"),
                AnimEvent::Finished => {
                    dp.finish().expect("finish failed");
                }
            }
        }
        now += clock_step_ms;
    }

    statuses
}

#[test]
fn test_add_animation_end_to_end() {
    let config = Config::default();
    let mut dp = Datapath::new("a", "5", "add r1, r2");

    let statuses = animate(&mut dp, &config, 60);

    assert_eq!(statuses.len(), 9);
    assert_eq!(statuses[0], "PC → MAR");
    assert_eq!(statuses[3], "IR = ADD R1, R2");
    assert_eq!(statuses[8], "Z → R1 = F");
    assert_eq!(dp.state, RunState::Done);
    assert_eq!(dp.status, "Done — ADD result: 0F");
    assert_eq!(dp.regs.r1.input, "0F");
    assert_eq!(dp.active, Some(Component::Z));
}

#[test]
fn test_coarse_clock_gives_same_result() {
    let config = Config::default();
    let mut fine = Datapath::new("1234", "10", "MUL R1,R2");
    let mut coarse = Datapath::new("1234", "10", "MUL R1,R2");

    let a = animate(&mut fine, &config, 7);
    let b = animate(&mut coarse, &config, 5_000);

    assert_eq!(a, b);
    assert_eq!(fine.regs.r1.input, "2340");
    assert_eq!(fine.scene(), coarse.scene());
}

#[test]
fn test_eased_animation_on_scaled_layout() {
    let config = Config {
        animation: AnimationConfig { step_ms: 200, tick_ms: 20, pause_ms: 0, easing: Easing::EaseInOut },
        layout: Layout::default().scaled(1.5, 1.5),
    };
    let mut dp = Datapath::new("FFFF", "2", "SUB R1,R2");
    animate(&mut dp, &config, 33);

    assert_eq!(dp.regs.r1.input, "FFFD");
    for (_, arrow) in dp.arrows() {
        let from = config.layout.rect_info(arrow.from).unwrap();
        let to = config.layout.rect_info(arrow.to).unwrap();
        assert!(from.contains(arrow.curve.start));
        assert!(to.contains(arrow.curve.end));
    }
}

#[test]
fn test_rejected_inputs_never_animate() {
    let mut dp = Datapath::new("12", "zz", "ADD R1,R2");
    assert!(dp.start().is_err());
    assert_eq!(dp.status, "Enter valid hex in R1 and R2");

    let mut dp = Datapath::new("12", "34", "ADD R1 R2");
    assert!(dp.start().is_err());
    assert_eq!(dp.status, "Instruction format invalid. Use: OPCODE R1,R2");
}

#[test]
fn test_svg_frames_for_mov() {
    let layout = Layout::default();
    let mut dp = Datapath::new("0A", "7b", "MOV R1,R2");
    let steps = dp.start().unwrap().len();

    let mut frames = Vec::new();
    for i in 0..steps {
        dp.highlight_step(i, &layout).unwrap();
        frames.push(render_svg(&dp.scene(), &layout, 1.0).unwrap());
    }
    dp.finish().unwrap();
    let last = render_svg(&dp.scene(), &layout, 1.0).unwrap();

    assert_eq!(frames.len(), 6);
    assert!(frames[4].contains("R2 (7B) → MDR"));
    assert!(frames[5].contains(r#"id="arrow-5" class="arrow active""#));
    assert!(last.contains("Done — MOV result: 7B"));
    assert!(last.contains(">7B</text>"));
    assert_eq!(dp.regs.r1.value().unwrap().word(), Word16::new(0x7B));
}

#[test]
fn test_plan_json_shape() {
    let mut dp = Datapath::new("A", "5", "ADD R1,R2");
    dp.start().unwrap();
    let json = serde_json::to_value(dp.plan()).unwrap();

    assert_eq!(json["result"], 15);
    assert_eq!(json["steps"][0]["highlight"], "PC");
    assert_eq!(json["steps"][0]["transfer"]["to"], "MAR");
    assert!(json["steps"][3]["transfer"].is_null());
}
