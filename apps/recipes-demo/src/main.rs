mod host;
mod http_source;

use std::cell::Cell;
use std::rc::Rc;

use anyhow::bail;
use clap::Parser;
use feedscroll_gestures::{Axis, DragPhase, PointerSample};
use feedscroll_paging::{
    DifficultySelector, FilterSelectors, MealTypeSelector, PagingConfig, PagingDataStore,
    DEFAULT_PAGE_SIZE,
};
use feedscroll_ui::{DetailState, RecipeCarousel, RecipeFooter, RecordDetail};

use host::{FrameLoop, HeadlessSurface};
use http_source::{HttpRecordSource, DEFAULT_BASE_URL};

const CAROUSEL_VIEWPORT: f32 = 1200.0;
const CAROUSEL_ITEM: f32 = 336.0;
const FOOTER_VIEWPORT: f32 = 480.0;
const FOOTER_ROW: f32 = 72.0;
const FOOTER_WHEEL_STEP: f32 = 24.0;

/// Frames between scripted carousel flings.
const FLING_PERIOD: usize = 90;

/// Browse recipes through the paging store with a scripted user.
#[derive(Parser, Debug)]
#[command(name = "recipes-demo", version)]
struct Args {
    /// Base URL of the recipes API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Records requested per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Carousel meal type: breakfast, lunch or dinner.
    #[arg(long, default_value = "breakfast")]
    meal_type: MealTypeSelector,

    /// Carousel difficulty: all, easy or medium.
    #[arg(long, default_value = "all")]
    difficulty: DifficultySelector,

    /// Upper bound on simulated frames.
    #[arg(long, default_value_t = 1200)]
    frames: usize,

    /// Show a single record instead of browsing.
    #[arg(long)]
    detail: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let host = FrameLoop::new();
    let source = HttpRecordSource::new(&args.base_url)?;
    let store = PagingDataStore::new(
        Rc::new(source),
        host.handle(),
        PagingConfig::default().with_page_size(args.page_size),
    );

    match args.detail.as_deref() {
        Some(id) => show_detail(&host, store, id, args.frames),
        None => browse(&host, store, FilterSelectors::new(args.difficulty, args.meal_type), args.frames),
    }
}

fn browse(host: &FrameLoop, store: PagingDataStore, selectors: FilterSelectors, frames: usize) -> anyhow::Result<()> {
    let _failures = store.subscribe_load_failed(|error| log::warn!("page load failed: {error}"));

    let carousel_surface = Rc::new(HeadlessSurface::new(Axis::Horizontal, CAROUSEL_VIEWPORT, CAROUSEL_ITEM));
    let footer_surface = Rc::new(HeadlessSurface::new(Axis::Vertical, FOOTER_VIEWPORT, FOOTER_ROW));
    let carousel = RecipeCarousel::new(store.clone(), carousel_surface.clone(), host.frame_clock(), selectors);
    let footer = RecipeFooter::new(store.clone(), footer_surface.clone(), host.frame_clock());

    log::info!("browsing /{selectors}");
    let mut frame = 0;
    while frame < frames {
        host.tick();
        carousel_surface.set_item_count(carousel.visible().len());
        footer_surface.set_item_count(footer.records().len());

        if !store.is_empty() {
            drive_pointer(&carousel, frame, host.now_ms());
            footer_surface.scroll_by(FOOTER_WHEEL_STEP);
        }
        if carousel_surface.take_scrolled() {
            carousel.on_scroll();
        }
        if footer_surface.take_scrolled() {
            footer.on_scroll();
        }

        if store.is_complete() && carousel.drag().phase() == DragPhase::Idle {
            break;
        }
        host.sleep_frame();
        frame += 1;
    }

    log::info!(
        "{} frames: {} of {} records in {} pages{}",
        frame,
        store.len(),
        store
            .total_count()
            .map_or_else(|| "?".to_string(), |total| total.to_string()),
        store.page_cursor(),
        if store.is_complete() { ", complete" } else { "" }
    );

    let visible = carousel.visible();
    println!(
        "/{} ({} recipes, scrolled to {:.0})",
        carousel.selectors(),
        visible.len(),
        carousel_surface.position()
    );
    for record in visible.iter() {
        println!(
            "  #{:<4} {:<40} {:<6} {}",
            record.id.0,
            record.title,
            record.difficulty.as_str(),
            carousel.image_url(record)
        );
    }
    println!(
        "footer: {} recipes, scrolled to row {}",
        footer.records().len(),
        footer_surface.first_visible_index()
    );
    Ok(())
}

/// Replays a leftward fling every [`FLING_PERIOD`] frames.
fn drive_pointer(carousel: &RecipeCarousel, frame: usize, now_ms: f64) {
    const START_X: f32 = 900.0;
    const STEP_X: f32 = 50.0;

    match frame % FLING_PERIOD {
        0 => carousel.pointer_down(PointerSample::new(START_X, now_ms)),
        step @ 1..=6 => {
            let x = START_X - STEP_X * step as f32;
            carousel.pointer_move(PointerSample::new(x, now_ms));
        }
        7 => carousel.pointer_up(),
        _ => {}
    }
}

fn show_detail(host: &FrameLoop, store: PagingDataStore, id: &str, frames: usize) -> anyhow::Result<()> {
    let left = Rc::new(Cell::new(None));
    let left_to = Rc::clone(&left);
    let detail = RecordDetail::new(store, host.handle()).on_leave(move |selectors| left_to.set(Some(selectors)));

    detail.show(id);
    host.run_until(frames, || !detail.is_loading());

    match detail.state() {
        DetailState::Loaded(record) => {
            println!("#{} {}", record.id, record.title);
            println!("  {} / {}", record.cuisine, record.difficulty);
            if let Some(minutes) = record.total_time_minutes() {
                println!("  ready in {minutes} min");
            }
            if let Some(rating) = record.rating {
                println!("  rated {rating:.1} ({} reviews)", record.review_count.unwrap_or(0));
            }
            println!("  meal: {}", record.meal_type.join(", "));
            println!("  image: {}", detail.image_url().unwrap_or_default());
            for ingredient in &record.ingredients {
                println!("  - {ingredient}");
            }
            for (step, instruction) in record.instructions.iter().enumerate() {
                println!("  {}. {instruction}", step + 1);
            }
            Ok(())
        }
        DetailState::Failed(error) => {
            println!("could not show recipe {id}: {error}");
            if let Some(selectors) = left.get() {
                println!("back to /{selectors}");
            }
            Ok(())
        }
        DetailState::Loading(_) | DetailState::Idle => bail!("recipe {id} did not load within {frames} frames"),
    }
}
