//! Round-trip fidelity of the library document format

use pretty_assertions::assert_eq;

use vfx_templates::{
    parse_document, write_document, InMemoryAssets, ParamKind, ParamValue, Template, Vector2,
    Vector3, Vector4,
};

fn full_template(assets: &InMemoryAssets) -> Template {
    use vfx_templates::AssetResolver;

    let noise = assets.load("Textures/noise.png").expect("Should load");
    let volume = assets.load("Textures/smoke_volume.asset").expect("Should load");

    let mut t = Template::new("Effects", "Smoke");
    t.add_context_node("Init", "InitializeParticle")
        .expect("Should add node");
    t.add_context_node("Update", "UpdateParticle")
        .expect("Should add node");
    t.add_context_node("Output", "QuadOutput")
        .expect("Should add node");

    t.set_parameter("Init", "Lifetime", ParamValue::Float(2.5))
        .expect("Should set");
    t.set_parameter("Init", "Seed", ParamValue::Int(-7))
        .expect("Should set");
    t.set_parameter("Init", "Capacity", ParamValue::Uint(4096))
        .expect("Should set");
    t.set_parameter("Update", "Drag", ParamValue::Float2(Vector2::new(0.5, 0.25)))
        .expect("Should set");
    t.set_parameter("Output", "Tint", ParamValue::Float4(Vector4::new(1.0, 0.5, 0.25, 1.0)))
        .expect("Should set");
    t.set_parameter("Output", "MainTexture", ParamValue::Texture2D(noise))
        .expect("Should set");

    t.add_block("Update", "Turbulence", "VectorFieldForce")
        .expect("Should add block");
    t.set_block_parameter(
        "Update",
        "Turbulence",
        "Field",
        ParamValue::Texture3D(volume),
    )
    .expect("Should set");
    t.set_block_parameter(
        "Update",
        "Turbulence",
        "Intensity",
        ParamValue::Float3(Vector3::new(0.0, 1.0, 0.0)),
    )
    .expect("Should set");

    t.add_connection("Init", "Update").expect("Should connect");
    t.add_connection("Update", "Output").expect("Should connect");
    t
}

#[test]
fn save_then_load_reproduces_the_template() {
    let assets = InMemoryAssets::new();
    let template = full_template(&assets);

    let xml = write_document(&[template.clone()], &assets).expect("Should write");
    let parsed = parse_document(&xml, &assets).expect("Should parse");

    assert!(parsed.warnings.is_empty());
    assert_eq!(parsed.templates, vec![template]);
}

#[test]
fn resave_of_a_loaded_library_is_byte_identical() {
    let assets = InMemoryAssets::new();
    let mut other = Template::new("Spawn", "Burst");
    other
        .add_context_node("N1", "InitializeParticle")
        .expect("Should add node");

    let first = write_document(&[full_template(&assets), other], &assets).expect("Should write");
    let parsed = parse_document(&first, &assets).expect("Should parse");
    let second = write_document(&parsed.templates, &assets).expect("Should rewrite");

    assert_eq!(first, second);
}

#[test]
fn worked_example_spawn_basic() {
    let assets = InMemoryAssets::new();
    let mut template = Template::new("Spawn", "Basic");
    template
        .add_context_node("N1", "InitializeParticle")
        .expect("Should add node");
    template
        .set_parameter("N1", "Lifetime", ParamValue::Float(2.5))
        .expect("Should set");
    template.add_block("N1", "B1", "SetColor").expect("Should add block");
    template
        .set_block_parameter("N1", "B1", "Color", ParamValue::Float3(Vector3::new(1.0, 0.0, 0.0)))
        .expect("Should set");

    let xml = write_document(&[template], &assets).expect("Should write");
    let parsed = parse_document(&xml, &assets).expect("Should parse");

    let loaded = &parsed.templates[0];
    assert_eq!(loaded.path(), "Spawn/Basic");
    assert_eq!(loaded.node_count(), 1);

    let node = loaded.node("N1").expect("Should have node");
    assert_eq!(node.context_type(), "InitializeParticle");
    assert_eq!(node.parameters().count(), 1);
    let lifetime = node.parameter("Lifetime").expect("Should have parameter");
    assert_eq!(lifetime.kind(), ParamKind::Float);
    assert_eq!(lifetime.as_float().expect("Should be a float"), 2.5);

    let block = node.block("B1").expect("Should have block");
    assert_eq!(block.block_type(), "SetColor");
    let color = block
        .parameter("Color")
        .expect("Should have parameter")
        .as_float3()
        .expect("Should be a float3");
    assert_eq!((color.x, color.y, color.z), (1.0, 0.0, 0.0));

    assert!(loaded.connections().is_empty());
}

#[test]
fn connection_pairs_survive_by_name() {
    let assets = InMemoryAssets::new();
    let template = full_template(&assets);
    let xml = write_document(&[template], &assets).expect("Should write");
    let parsed = parse_document(&xml, &assets).expect("Should parse");

    let loaded = &parsed.templates[0];
    let pairs: Vec<(&str, &str)> = loaded
        .connections()
        .iter()
        .map(|c| {
            (
                loaded.node_name(c.previous).expect("Should resolve"),
                loaded.node_name(c.next).expect("Should resolve"),
            )
        })
        .collect();
    assert_eq!(pairs, [("Init", "Update"), ("Update", "Output")]);
}

#[test]
fn texture_paths_survive_through_the_resolver() {
    let assets = InMemoryAssets::new();
    let template = full_template(&assets);
    let xml = write_document(&[template], &assets).expect("Should write");
    assert!(xml.contains(r#"Value="Textures/noise.png""#));
    assert!(xml.contains(r#"Value="Textures/smoke_volume.asset""#));

    // a separate session with its own resolver still round-trips the paths
    let fresh = InMemoryAssets::new();
    let parsed = parse_document(&xml, &fresh).expect("Should parse");
    let rewritten = write_document(&parsed.templates, &fresh).expect("Should rewrite");
    assert!(rewritten.contains(r#"Value="Textures/noise.png""#));
}
