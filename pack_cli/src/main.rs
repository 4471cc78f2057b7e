//! # Packsim CLI Application
//!
//! Interactive terminal run of a packaging compliance study: pick a material,
//! configure scenarios, run them, review recommendations and optionally apply
//! one.
//!
//! Environment:
//! - `PACKSIM_SEED` - fixed seed for reproducible traces
//! - `PACKSIM_MATERIAL` - initial material key (default `PP`)
//! - `RUST_LOG` - log filter (e.g. `pack_core=debug`)
//!
//! Passing a file path as the first argument saves the session there on exit.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use pack_core::calculations::TestDetails;
use pack_core::errors::SimResult;
use pack_core::pipeline::{ComplianceReport, Pipeline};
use pack_core::recommendations::{OptimizationChoice, Recommendation};
use pack_core::scenarios::{DropConfig, TestConfig, TestType, TransportConfig, VibrationConfig};
use pack_core::scoring::PerformanceProfile;
use pack_core::session::{Session, SessionSettings};
use pack_core::{save_session, TestResult};

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return None;
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_text(prompt: &str, default: &str) -> String {
    prompt_line(prompt).unwrap_or_else(|| default.to_string())
}

fn settings_from_env() -> SessionSettings {
    let mut settings = SessionSettings::default();
    if let Ok(seed) = env::var("PACKSIM_SEED") {
        match seed.parse() {
            Ok(seed) => settings.seed = Some(seed),
            Err(_) => log::warn!("ignoring PACKSIM_SEED={:?}: not an unsigned integer", seed),
        }
    }
    if let Ok(material) = env::var("PACKSIM_MATERIAL") {
        settings.default_material = material;
    }
    settings
}

fn prompt_test_types() -> Vec<TestType> {
    let answer = prompt_text(
        "Tests to run (drop, vibration, transport) [drop,vibration,transport]: ",
        "drop,vibration,transport",
    );
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<TestType>() {
            Ok(t) => Some(t),
            Err(e) => {
                println!("  skipping: {}", e);
                None
            }
        })
        .collect()
}

fn prompt_config(test_type: TestType) -> TestConfig {
    match test_type {
        TestType::Drop => {
            let d = DropConfig::default();
            let height = prompt_f64(&format!("  Drop height (m) [{}]: ", d.height_m), d.height_m);
            TestConfig::Drop(DropConfig { height_m: height, ..d })
        }
        TestType::Vibration => {
            let d = VibrationConfig::default();
            let g = prompt_f64(
                &format!("  Vibration level (g RMS) [{}]: ", d.g_force_rms),
                d.g_force_rms,
            );
            let band = prompt_text(
                &format!("  Frequency range [{}]: ", d.frequency_range.label()),
                d.frequency_range.label(),
            );
            let boxes = prompt_u32("  Boxes stacked above [3]: ", 3);
            let kg = prompt_f64("  Mass per box (kg) [1.5]: ", 1.5);
            TestConfig::Vibration(VibrationConfig::new(
                g,
                &band,
                VibrationConfig::stacking_load_from_boxes(boxes, kg),
            ))
        }
        TestType::Transport => {
            let d = TransportConfig::default();
            let distance = prompt_u32(
                &format!("  Distance (km) [{}]: ", d.distance_km),
                d.distance_km,
            );
            let route = prompt_text(
                &format!("  Route type [{}]: ", d.route_type.label()),
                d.route_type.label(),
            );
            TestConfig::Transport(TransportConfig::new(distance, &route))
        }
    }
}

fn print_result(result: &TestResult) {
    println!(
        "  {:<10} max {:>7.2} MPa   SF {:>5.2}   {} {}",
        result.test_type.display_name(),
        result.max_stress_mpa,
        result.safety_factor,
        result.compliance,
        status_icon(result.passes())
    );
    match &result.details {
        TestDetails::Drop {
            impact_velocity_m_s,
            kinetic_energy_j,
        } => println!(
            "             impact {:.2} m/s, energy {:.2} J",
            impact_velocity_m_s, kinetic_energy_j
        ),
        TestDetails::Vibration { response } => {
            let (f, a) = response.peak();
            println!(
                "             band {}, peak response {:.2} at {:.1} Hz",
                response.band.label(),
                a,
                f
            );
        }
        TestDetails::Transport { max_g_force, trace } => println!(
            "             peak {:.2} g, top speed {:.0} km/h, {:.1} h on the road",
            max_g_force, trace.max_speed, trace.total_time_hours
        ),
    }
}

fn print_report(pipeline: &Pipeline, report: &ComplianceReport) {
    println!("═══════════════════════════════════════");
    println!("  COMPLIANCE RESULTS ({})", pipeline.selected_material_key());
    println!("═══════════════════════════════════════");
    for result in pipeline.results() {
        print_result(result);
    }
    println!();
    println!(
        "  RESULT: {} ({}/{} passed, min SF {:.2}, max stress {:.2} MPa)",
        report.overall,
        report.passed.len(),
        report.total(),
        report.min_safety_factor,
        report.max_stress_mpa
    );
    println!("═══════════════════════════════════════");
}

fn print_recommendation(rec: &Recommendation) {
    println!();
    println!("Recommendations:");
    if !rec.structural_changes.is_empty() {
        println!("  Structural changes:");
        for change in &rec.structural_changes {
            println!("    - {}", change);
        }
    }
    if !rec.material_optimization.is_empty() {
        println!("  Material tuning:");
        for (property, suggestion) in &rec.material_optimization {
            println!("    - {}: {}", property, suggestion);
        }
    }
    if let Some(material) = &rec.new_material {
        println!(
            "  Optimized material: {} (yield {:.1} MPa, {:.0} kg/m³, ${:.2}/kg)",
            material.name,
            material.yield_strength_mpa().value(),
            material.density_kg_m3,
            material.cost_per_kg
        );
    }
}

fn prompt_choice(rec: &Recommendation) -> Option<OptimizationChoice> {
    println!();
    for (i, choice) in OptimizationChoice::ALL.iter().enumerate() {
        let unavailable = *choice == OptimizationChoice::OptimizedMaterial && rec.new_material.is_none();
        println!(
            "  {}. {}{}",
            i + 1,
            choice.label(),
            if unavailable { " (keeps current material)" } else { "" }
        );
    }
    let answer = prompt_line("Apply which option? [skip]: ")?;
    let index: usize = answer.parse().ok()?;
    OptimizationChoice::ALL.get(index.checked_sub(1)?).copied()
}

fn print_profile(profile: &PerformanceProfile) {
    println!();
    println!("Performance profile (score / target):");
    for s in &profile.scores {
        println!(
            "  {:<26} {:>4.1} / {:>4.1}",
            s.criterion.display_name(),
            s.score,
            s.target
        );
    }
}

fn run() -> SimResult<()> {
    let save_path = env::args().nth(1).map(PathBuf::from);

    let settings = settings_from_env();
    let session = Session::with_settings("", "CLI study", settings);
    let mut pipeline = Pipeline::from_session(session)?;

    let keys: Vec<&str> = pipeline.catalog().keys().collect();
    println!("Materials: {}", keys.join(", "));
    let material = prompt_text(
        &format!("Material [{}]: ", pipeline.selected_material_key()),
        pipeline.selected_material_key(),
    );
    pipeline.select_material(&material)?;

    println!();
    let tests: Vec<TestConfig> = prompt_test_types().into_iter().map(prompt_config).collect();
    pipeline.configure(tests)?;

    println!();
    println!("Running simulations...");
    println!();
    let report = pipeline.run_all()?;
    print_report(&pipeline, &report);

    if !report.failed.is_empty() {
        let rec = pipeline.recommend()?;
        print_recommendation(&rec);

        if let Some(choice) = prompt_choice(&rec) {
            let retested = pipeline.apply_optimization(choice, &rec)?;
            println!();
            println!("Applied {} to {} test(s).", choice.label(), retested.len());
            println!();
            print_report(&pipeline, &pipeline.aggregate()?);
        }
    }

    print_profile(&pipeline.performance_profile()?);

    println!();
    println!("JSON Output (for LLM/API use):");
    if let Ok(json) = serde_json::to_string_pretty(&pipeline.aggregate()?) {
        println!("{}", json);
    }

    if let Some(path) = save_path {
        save_session(pipeline.session(), &path)?;
        println!();
        println!("Session saved to {}", path.display());
    }

    Ok(())
}

fn main() {
    env_logger::init();

    println!("Packsim CLI - Packaging Compliance Simulator");
    println!("============================================");
    println!();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
