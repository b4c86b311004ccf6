//! Datapath Visualizer - CLI Entry Point
//!
//! Commands:
//! - `datapath-viz run` - Execute an instruction and print each micro-step
//! - `datapath-viz plan` - Print the micro-step plan as JSON
//! - `datapath-viz svg` - Write one SVG frame per micro-step
//! - `datapath-viz watch` - Animate in the terminal
//! - `datapath-viz config` - Print the effective configuration

use std::path::{Path, PathBuf};
use clap::{Args, Parser, Subcommand};
use datapath::{logging, Config};

#[derive(Parser)]
#[command(name = "datapath-viz")]
#[command(version = "0.1.0")]
#[command(about = "An animated micro-operation visualizer for a simple CPU datapath")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON file with animation timing and box layout
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Register values and the instruction to execute.
#[derive(Args, Clone)]
struct Inputs {
    /// R1 value in hex
    #[arg(long, default_value = "0A")]
    r1: String,
    /// R2 value in hex
    #[arg(long, default_value = "05")]
    r2: String,
    /// Instruction, e.g. "ADD R1,R2"
    #[arg(short, long, default_value = "ADD R1,R2")]
    instr: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute an instruction and print each micro-step
    Run {
        #[command(flatten)]
        inputs: Inputs,
        /// Also print the SVG path of each arrow
        #[arg(short, long)]
        trace: bool,
        /// Play the steps with the configured timing
        #[arg(long)]
        realtime: bool,
    },
    /// Print the micro-step plan as JSON
    Plan {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Write one SVG frame per micro-step
    Svg {
        #[command(flatten)]
        inputs: Inputs,
        /// Directory for the frames
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Animate in the terminal
    #[cfg(feature = "tui")]
    Watch {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Print the effective configuration as JSON
    Config,
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "tui")]
    let owns_terminal = matches!(cli.command, Some(Commands::Watch { .. }));
    #[cfg(not(feature = "tui"))]
    let owns_terminal = false;

    if !owns_terminal {
        logging::init(cli.verbose);
    }

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Run { inputs, trace, realtime }) => {
            run_instruction(&inputs, &config, trace, realtime);
        }
        Some(Commands::Plan { inputs }) => {
            print_plan(&inputs);
        }
        Some(Commands::Svg { inputs, out_dir }) => {
            write_frames(&inputs, &config, &out_dir);
        }
        #[cfg(feature = "tui")]
        Some(Commands::Watch { inputs }) => {
            watch(&inputs, config);
        }
        Some(Commands::Config) => {
            print_config(&config);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Datapath Visualizer v0.1.0");
            println!("Micro-operations of a register-pair CPU, one arrow at a time");
            println!();
            println!("Use --help for available commands");
            println!();
            demo(&config);
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    match Config::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn start(inputs: &Inputs) -> datapath::Datapath {
    let mut dp = datapath::Datapath::new(&inputs.r1, &inputs.r2, &inputs.instr);
    if let Err(e) = dp.start() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    dp
}

fn run_instruction(inputs: &Inputs, config: &Config, trace: bool, realtime: bool) {
    use datapath::{AnimEvent, Player};
    use std::time::{Duration, Instant};

    let mut dp = start(inputs);
    println!("🔧 {}", dp.status);
    println!();

    let steps = dp.plan().map_or(0, |p| p.len());
    let show = |dp: &mut datapath::Datapath, index: usize| {
        if let Err(e) = dp.highlight_step(index, &config.layout) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        let label = dp.active.map(|c| c.label()).unwrap_or("");
        println!("{:02}  [{:<3}]  {}", index + 1, label, dp.status);
        if trace {
            if let Some((_, arrow)) = dp.arrows().find(|(_, a)| a.active) {
                println!("           {} → {}: {}", arrow.from, arrow.to, arrow.curve.path_data());
            }
        }
    };

    if realtime {
        let mut player = Player::new(steps, config.animation);
        let started = Instant::now();
        while !player.is_finished() {
            let elapsed = started.elapsed().as_millis() as u64;
            for event in player.advance(elapsed) {
                match event {
                    AnimEvent::Highlight(i) => show(&mut dp, i),
                    AnimEvent::Redraw(i) => {
                        if let Err(e) = dp.redraw_arrow(i, &config.layout) {
                            eprintln!("❌ {}", e);
                            std::process::exit(1);
                        }
                    }
                    AnimEvent::Finished => {}
                }
            }
            if let Some(wait) = player.next_due_in() {
                std::thread::sleep(Duration::from_millis(wait.max(1)));
            }
        }
    } else {
        for index in 0..steps {
            show(&mut dp, index);
        }
    }

    if let Err(e) = dp.finish() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    println!();
    println!("━━━ Result ━━━");
    println!("{}", dp.status);
    println!("R1: {}", dp.regs.r1.shown);
    println!("R2: {}", dp.regs.r2.shown);
}

fn print_plan(inputs: &Inputs) {
    let dp = start(inputs);
    match serde_json::to_string_pretty(&dp.plan()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Failed to serialize plan: {}", e);
            std::process::exit(1);
        }
    }
}

fn write_frames(inputs: &Inputs, config: &Config, out_dir: &Path) {
    use datapath::render_svg;

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        eprintln!("❌ Failed to create {}: {}", out_dir.display(), e);
        std::process::exit(1);
    }

    let mut dp = start(inputs);
    let steps = dp.plan().map_or(0, |p| p.len());
    println!("🖼  Writing {} frames to {}", steps + 1, out_dir.display());

    let write = |dp: &datapath::Datapath, name: String| {
        let path = out_dir.join(name);
        let svg = match render_svg(&dp.scene(), &config.layout, 1.0) {
            Ok(svg) => svg,
            Err(e) => {
                eprintln!("❌ Failed to render: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&path, svg) {
            eprintln!("❌ Failed to write {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("  {}  {}", path.display(), dp.status);
    };

    for index in 0..steps {
        if let Err(e) = dp.highlight_step(index, &config.layout) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        write(&dp, format!("frame-{:02}.svg", index + 1));
    }

    if let Err(e) = dp.finish() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    write(&dp, "frame-final.svg".to_string());

    println!("✓ {}", dp.status);
}

#[cfg(feature = "tui")]
fn watch(inputs: &Inputs, config: Config) {
    use datapath::run_visualizer;

    if let Err(e) = run_visualizer(&inputs.r1, &inputs.r2, &inputs.instr, config) {
        eprintln!("❌ Visualizer error: {}", e);
        std::process::exit(1);
    }
}

fn print_config(config: &Config) {
    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn demo(config: &Config) {
    use datapath::{Datapath, Opcode};

    println!("━━━ Instruction Demo (R1=0A, R2=05) ━━━");
    println!();

    for op in Opcode::ALL {
        let mut dp = Datapath::new("0A", "05", format!("{} R1,R2", op));
        match dp.run_to_completion(&config.layout) {
            Ok(_) => println!("  {:<10} {}", format!("{} R1,R2", op), dp.status),
            Err(e) => println!("  {:<10} ❌ {}", format!("{} R1,R2", op), e),
        }
    }
    println!();
    println!("Try: datapath-viz run --r1 1234 --r2 10 -i \"MUL R1,R2\" --trace");
}

fn run_self_test() {
    use datapath::{edge_point_towards, curved_arrow, parse_instruction, Datapath, Layout, Point, RectInfo, Word16};
    use datapath::word::arith;

    println!("━━━ Datapath Visualizer Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    // Test 1: 16-bit masking
    print!("ALU results wrap at 16 bits... ");
    let a = Word16::new(0xFFFF);
    let b = Word16::new(0x0002);
    if arith::add(a, b) == Word16::new(1)
        && arith::subtract(b, a) == Word16::new(3)
        && arith::multiply(a, b) == Word16::new(0xFFFE)
    {
        println!("✓");
        passed += 1;
    } else {
        println!("✗");
        failed += 1;
    }

    // Test 2: Parser acceptance
    print!("Instruction parser accepts/rejects... ");
    let ok = ["ADD R1,R2", "mov r1 , r2", "XYZ A,B"].iter().all(|t| parse_instruction(t).is_ok())
        && ["ADD", "ADD R1 R2", "ADD R1,R2,R3", ""].iter().all(|t| parse_instruction(t).is_err());
    if ok { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 3: Edge points
    print!("Edge point lies on the box border... ");
    let rect = RectInfo { cx: 0.0, cy: 0.0, hw: 50.0, hh: 20.0 };
    let p = edge_point_towards(&rect, 10.0, 0.0);
    if (p.x - 49.2).abs() < 1e-9 && p.y == 0.0 {
        println!("✓");
        passed += 1;
    } else {
        println!("✗ (got {:?})", p);
        failed += 1;
    }

    // Test 4: Arrow bends away from center
    print!("Arrows bow away from the diagram center... ");
    let top_a = RectInfo { cx: 100.0, cy: 40.0, hw: 30.0, hh: 15.0 };
    let top_b = RectInfo { cx: 300.0, cy: 40.0, hw: 30.0, hh: 15.0 };
    let arrow = curved_arrow(&top_a, &top_b, Point::new(200.0, 200.0));
    if arrow.control.y < 40.0 {
        println!("✓");
        passed += 1;
    } else {
        println!("✗ (control {:?})", arrow.control);
        failed += 1;
    }

    // Test 5: Full run
    print!("ADD R1,R2 writes back to R1... ");
    let mut dp = Datapath::new("0A", "05", "ADD R1,R2");
    match dp.run_to_completion(&Layout::default()) {
        Ok(Some(v)) if v == Word16::new(0xF) && dp.regs.r1.shown == "0F" => {
            println!("✓");
            passed += 1;
        }
        other => {
            println!("✗ (got {:?})", other);
            failed += 1;
        }
    }

    // Test 6: MOV
    print!("MOV R1,R2 copies R2... ");
    let mut dp = Datapath::new("0A", "7B", "MOV R1,R2");
    let steps = dp.start().map(|p| p.len()).unwrap_or(0);
    if steps == 6 && dp.run_to_completion(&Layout::default()).ok().flatten() == Some(Word16::new(0x7B)) {
        println!("✓");
        passed += 1;
    } else {
        println!("✗");
        failed += 1;
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
