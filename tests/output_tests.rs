//! Output writer tests: JSON round-trip, folded lines, SVG rendering.

use pretty_assertions::assert_eq;
use stackflame::output::{read_tree, render_svg, to_folded_lines, write_folded, write_tree};
use stackflame::{analyze_dump, AnalysisSettings, FlameGraphTree, LeafValuePolicy, NullProgress};
use tempfile::NamedTempFile;

fn sample_tree() -> FlameGraphTree {
    let text = concat!(
        "\"request-1\" #11 tid=0x1 nid=0xa runnable\n",
        "   java.lang.Thread.State: RUNNABLE\n",
        "\tat com.example.Json.encode(Json.java:40)\n",
        "\tat com.example.Handler.respond(Handler.java:22)\n",
        "\n",
        "\"request-2\" #12 tid=0x2 nid=0xb runnable\n",
        "   java.lang.Thread.State: RUNNABLE\n",
        "\tat com.example.Db.query(Db.java:77)\n",
        "\tat com.example.Handler.respond(Handler.java:22)\n",
    );
    analyze_dump(
        text,
        &AnalysisSettings::default(),
        LeafValuePolicy::CountedLeaves,
        &mut NullProgress,
    )
    .unwrap()
    .tree
}

#[test]
fn test_json_round_trip() {
    let tree = sample_tree();
    let temp_file = NamedTempFile::new().unwrap();

    write_tree(&tree, temp_file.path()).unwrap();
    let loaded = read_tree(temp_file.path()).unwrap();

    assert_eq!(loaded, tree);
}

#[test]
fn test_json_omits_children_for_leaves() {
    let tree = sample_tree();
    let temp_file = NamedTempFile::new().unwrap();
    write_tree(&tree, temp_file.path()).unwrap();

    let raw = std::fs::read_to_string(temp_file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["name"], "(root)");
    assert_eq!(value["value"], 2);
    let leaf = &value["children"][0]["children"][0];
    assert!(leaf.get("children").is_none());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/tree.json");

    write_tree(&sample_tree(), &nested_path).unwrap();

    assert!(nested_path.exists());
}

#[test]
fn test_folded_lines_cover_every_leaf() {
    let lines = to_folded_lines(&sample_tree());
    assert_eq!(
        lines,
        vec![
            "com.example.Handler.respond(Handler.java:22);com.example.Json.encode(Json.java:40) 1",
            "com.example.Handler.respond(Handler.java:22);com.example.Db.query(Db.java:77) 1",
        ]
    );
}

#[test]
fn test_write_folded_file_contents() {
    let temp_file = NamedTempFile::new().unwrap();
    write_folded(&sample_tree(), temp_file.path()).unwrap();

    let contents = std::fs::read_to_string(temp_file.path()).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.ends_with('\n'));
}

#[test]
fn test_svg_rendering_smoke() {
    let svg = render_svg(&sample_tree(), "test dump").unwrap();
    let text = String::from_utf8(svg).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.contains("</svg>"));
}
