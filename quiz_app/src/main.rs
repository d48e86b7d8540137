//! Headless quiz viewer
//!
//! Bakes the configured font, writes the atlas to a PNG, lays out one quiz
//! question as a text batch and logs the draw calls it would record.

use anyhow::{Context, Result};
use ash::vk;
use clap::{Arg, Command};
use image::GrayImage;
use std::path::Path;

use text_render::prelude::*;
use text_render::foundation::logging::{error, info};

mod app_config;
use app_config::AppConfig;

const PROMPT_COLOR: TextColor = TextColor::WHITE;
const ANSWER_COLOR: TextColor = TextColor::new(0.85, 0.85, 0.3, 1.0);
const MARGIN: f32 = 40.0;

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = Command::new("quiz_app")
        .about("Bakes a font atlas and prints the text draw plan for a quiz question")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML or RON configuration file"),
        )
        .arg(
            Arg::new("question")
                .short('q')
                .long("question")
                .value_name("INDEX")
                .help("Zero-based question to lay out")
                .default_value("0"),
        )
        .arg(
            Arg::new("atlas-png")
                .long("atlas-png")
                .value_name("PATH")
                .help("Where to write the baked atlas (overrides the config)"),
        )
        .arg(
            Arg::new("write-default-config")
                .long("write-default-config")
                .value_name("FILE")
                .help("Write the default configuration to FILE and exit"),
        )
        .get_matches();

    if let Some(path) = matches.get_one::<String>("write-default-config") {
        AppConfig::default()
            .save_to_file(path)
            .with_context(|| format!("Failed to write default config to {}", path))?;
        println!("Default configuration written to {}", path);
        return Ok(());
    }

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => AppConfig::default(),
    };
    if let Some(path) = matches.get_one::<String>("atlas-png") {
        config.atlas_png_path = path.clone();
    }

    logging::init_with_default(&config.log_level);

    let question: usize = matches
        .get_one::<String>("question")
        .map(|q| q.parse::<usize>())
        .transpose()
        .context("Invalid question index")?
        .unwrap_or(0);

    let mut session = config.quiz.session().context("Failed to start quiz session")?;
    if !session.jump_to(question) {
        anyhow::bail!(
            "Question {} out of range (quiz has {})",
            question,
            session.total_questions()
        );
    }

    config.renderer.validate().context("Invalid renderer configuration")?;
    let rasterizer = FontdueRasterizer::from_file(&config.renderer.font_path, config.renderer.font_size)
        .context("Failed to load font")?;
    let atlas = AtlasBuilder::new(config.renderer.atlas_width, config.renderer.atlas_height)
        .build(&rasterizer)
        .context("Failed to bake font atlas")?;

    write_atlas_png(&atlas, Path::new(&config.atlas_png_path))?;

    let backend = RecordingBackend::new(config.renderer.max_vertices);
    let mut renderer = TextRenderer::from_atlas(&atlas, backend);
    let line_height = atlas.line_height().max(1) as f32;

    lay_out_question(&mut renderer, &session, config.viewport, line_height);
    renderer
        .end_batch(vk::CommandBuffer::null())
        .context("Failed to record text batch")?;

    print_draw_plan(&session, renderer.backend());
    Ok(())
}

fn lay_out_question(
    renderer: &mut TextRenderer<RecordingBackend>,
    session: &QuizSession,
    viewport: (u32, u32),
    line_height: f32,
) {
    let viewport_width = viewport.0 as f32;
    let mut baseline = MARGIN + line_height;

    renderer.begin_batch();
    renderer.add_text(session.current_prompt(), MARGIN, baseline, 1.0, PROMPT_COLOR);

    for (i, answer) in session.current_answers().iter().enumerate() {
        baseline += line_height * 1.5;
        let label = format!("{}) {}", i + 1, answer);
        let width = renderer.measure_text(&label, 1.0);
        let x = ((viewport_width - width) / 2.0).max(MARGIN);
        renderer.add_text(&label, x, baseline, 1.0, ANSWER_COLOR);
    }
}

fn write_atlas_png(atlas: &FontAtlas, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let (width, height) = atlas.size();
    let image = GrayImage::from_raw(width, height, atlas.bitmap.as_bytes().to_vec())
        .context("Atlas bitmap size does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("Failed to save atlas to {}", path.display()))?;

    info!("Atlas written to {}", path.display());
    Ok(())
}

fn print_draw_plan(session: &QuizSession, backend: &RecordingBackend) {
    println!(
        "Question {}/{}: {}",
        session.current_index() + 1,
        session.total_questions(),
        session.current_prompt()
    );
    for command in backend.commands() {
        match command {
            DrawCommand::Upload { vertex_count } => println!("  upload {} vertices", vertex_count),
            DrawCommand::Bind => println!("  bind pipeline, atlas, vertex buffer"),
            DrawCommand::PushColor(color) => println!("  push color {:?}", color.to_array()),
            DrawCommand::Draw { vertex_count, first_vertex } => {
                println!("  draw {} vertices from {}", vertex_count, first_vertex)
            }
        }
    }
    info!("Recorded {} draw calls", backend.draw_count());
}
