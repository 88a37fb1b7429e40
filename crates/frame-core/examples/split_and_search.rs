use frame_core::{
    Axis, ChangeKind, Confirmed, CoreConfig, Motion, PromptTag, Rect, Registry, SearchStatus,
};
use tracing::Level;

const CONFIG: &str = r#"
tab_width = 4
scroll_margin = 1
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .without_time()
        .init();

    let mut registry = Registry::with_config(CoreConfig::from_toml_str_or_default(CONFIG));
    registry.subscribe(|event| {
        if event.kind == ChangeKind::BufferModified {
            println!("buffer modified: {:?}", event.delta);
        }
    });

    let text: String = (0..40)
        .map(|i| {
            if i == 30 {
                "\tlet answer = 42;\n".to_string()
            } else {
                format!("\tline {i}\n")
            }
        })
        .collect();
    let buffer = registry.open_buffer(&text).unwrap();
    let left = registry
        .open_frame(buffer, Rect::new(0.0, 0.0, 120.0, 20.0))
        .unwrap();

    // Simulate a split pane: a second view into the same buffer.
    let right = registry.split(left, Axis::Horizontal).unwrap();
    registry.move_cursor(right, Motion::To(20)).unwrap();
    registry.insert_text(left, "// header\n").unwrap();
    println!(
        "left cursor: {}, right cursor: {}",
        registry.frame(left).unwrap().cursor(),
        registry.frame(right).unwrap().cursor()
    );

    // Incremental search from the left view.
    let search = registry.open_search(left).unwrap();
    registry.insert_text(search, "answer").unwrap();
    let status = registry.frame(search).unwrap().search().unwrap().status;
    println!(
        "search status: {:?}, left scroll_top: {}",
        status,
        registry.frame(left).unwrap().scroll_top()
    );
    if status == SearchStatus::Found
        && let Confirmed::Search { found, .. } = registry.confirm(search).unwrap()
    {
        println!("jumped to {:?}", found);
    }

    // A prompt whose meaning belongs to the host.
    let prompt = registry
        .open_prompt(left, PromptTag::new("save-as"))
        .unwrap();
    registry.insert_text(prompt, "demo.txt").unwrap();
    if let Confirmed::Prompt { tag, text, .. } = registry.confirm(prompt).unwrap() {
        println!("host handles {} -> {}", tag.as_str(), text);
    }

    for id in registry.paint_order() {
        let snapshot = registry.snapshot(id).unwrap();
        println!(
            "paint frame {:?}: cursor={} top={} focused={}",
            snapshot.kind, snapshot.cursor, snapshot.scroll_top, snapshot.focused
        );
    }
    println!("repaint requested: {}", registry.take_repaint_request());
}
