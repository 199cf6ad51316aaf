//! Scene documents: parsing, validation and loading

use std::time::Duration;

use kagura::*;

const NEIGHBOUR: &str = r##"{
  "shapes": [
    { "name": "a", "type": "circle", "x": 0, "y": 0, "radius": 50,
      "attrs": { "fillColor": "red" } },
    { "name": "b", "type": "circle", "x": 0, "y": 50, "radius": 50,
      "attrs": { "fillColor": "#0000ff" } }
  ],
  "animations": [
    { "name": "slide", "duration": "1s",
      "properties": { "x": 100, "fillColor": "green" },
      "subjects": ["a", "b"], "autoplay": true }
  ]
}"##;

fn parse(json: &str) -> SceneDocument {
    serde_json::from_str(json).unwrap()
}

// =============================================================
// パース
// =============================================================

mod parse_tests {
    use super::*;

    #[test]
    fn parses_shapes_and_animations() {
        let doc = parse(NEIGHBOUR);
        assert_eq!(doc.shapes.len(), 2);
        assert_eq!(doc.shapes[0].name, "a");
        assert_eq!(
            doc.shapes[0].geometry,
            GeometryDef::Circle {
                x: 0.0,
                y: 0.0,
                radius: 50.0
            }
        );
        assert_eq!(
            doc.shapes[0].attrs["fillColor"],
            AttrValue::Color(Color::RED)
        );

        let slide = &doc.animations[0];
        assert_eq!(slide.duration, DurationSpec::Text("1s".into()));
        assert_eq!(slide.properties["x"], AttrValue::Number(100.0));
        assert_eq!(slide.easing, Easing::Linear);
        assert_eq!(slide.subjects, vec!["a", "b"]);
        assert!(slide.autoplay);
    }

    #[test]
    fn parses_every_geometry() {
        let doc = parse(
            r#"{ "shapes": [
                { "name": "r", "type": "rect", "x": 1, "y": 2, "width": 3, "height": 4 },
                { "name": "e", "type": "ellipse", "x": 1, "y": 2, "radiusX": 3, "radiusY": 4 }
            ] }"#,
        );
        assert_eq!(doc.shapes[0].geometry.kind(), ShapeKind::Rect);
        assert_eq!(
            doc.shapes[1].geometry,
            GeometryDef::Ellipse {
                x: 1.0,
                y: 2.0,
                radius_x: 3.0,
                radius_y: 4.0
            }
        );
        assert!(doc.animations.is_empty());
    }

    #[test]
    fn millisecond_durations_and_easing() {
        let doc = parse(
            r#"{ "animations": [
                { "name": "fade", "duration": 250, "easing": "cubic_out",
                  "properties": { "opacity": 0 } }
            ] }"#,
        );
        let animation = doc.animations[0].to_animation().unwrap();
        assert_eq!(animation.duration(), Duration::from_millis(250));
        assert_eq!(animation.easing(), Easing::CubicOut);
        assert!(!doc.animations[0].autoplay);
    }

    #[test]
    fn unknown_geometry_type_fails_to_parse() {
        let result: std::result::Result<SceneDocument, serde_json::Error> = serde_json::from_str(
            r#"{ "shapes": [ { "name": "t", "type": "triangle", "x": 0, "y": 0 } ] }"#,
        );
        assert!(result.is_err());
    }
}

// =============================================================
// 検証
// =============================================================

mod validate_tests {
    use super::*;

    #[test]
    fn valid_document_passes() {
        assert!(parse(NEIGHBOUR).validate().is_ok());
    }

    #[test]
    fn collects_every_error() {
        let doc = parse(
            r#"{
              "shapes": [
                { "name": "a", "type": "circle", "x": 0, "y": 0, "radius": 5,
                  "attrs": { "width": 3 } },
                { "name": "a", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 },
                { "name": "c", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1,
                  "attrs": { "fillColor": "nope" } }
              ],
              "animations": [
                { "name": "bad", "duration": "soon", "properties": { "fill": "red" },
                  "subjects": ["ghost"] },
                { "name": "grow", "duration": "1s", "properties": { "radius": 10 },
                  "subjects": ["c"] }
              ]
            }"#,
        );
        let errors = doc.validate().unwrap_err();
        assert_eq!(errors.len(), 7, "{errors:?}");
        assert!(errors.iter().any(|e| matches!(
            e,
            KaguraError::InvalidProperty { name, shape } if name == "width" && *shape == "circle"
        )));
        assert!(errors
            .iter()
            .any(|e| matches!(e, KaguraError::DuplicateName(name) if name == "a")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, KaguraError::InvalidColor(_))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, KaguraError::InvalidDuration(_))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, KaguraError::UnknownProperty(name) if name == "fill")));
        assert!(errors.iter().any(|e| matches!(
            e,
            KaguraError::UndefinedSubject { animation, name } if animation == "bad" && name == "ghost"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            KaguraError::InvalidProperty { name, shape } if name == "radius" && *shape == "rect"
        )));
    }

    #[test]
    fn subject_kind_checked_against_targets() {
        let doc = parse(
            r#"{
              "shapes": [ { "name": "r", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } ],
              "animations": [
                { "name": "grow", "duration": "1s", "properties": { "radius": 10 },
                  "subjects": ["r"] }
              ]
            }"#,
        );
        let errors = doc.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            KaguraError::InvalidProperty { name, shape } if name == "radius" && *shape == "rect"
        ));
    }

    #[test]
    fn empty_properties_rejected() {
        let doc = parse(
            r#"{ "animations": [ { "name": "noop", "duration": "1s", "properties": {} } ] }"#,
        );
        assert_eq!(doc.validate().unwrap_err(), vec![KaguraError::EmptyTargets]);
    }

    #[test]
    fn load_refuses_invalid_document() {
        let doc = parse(
            r#"{ "animations": [ { "name": "x", "duration": "0s", "properties": { "x": 1 } } ] }"#,
        );
        assert!(doc.load().is_err());
    }
}

// =============================================================
// 読み込み
// =============================================================

mod load_tests {
    use super::*;

    #[test]
    fn load_builds_and_autoplays() {
        let mut scene = parse(NEIGHBOUR).load().unwrap();
        let a = scene.shape("a").unwrap();
        let b = scene.shape("b").unwrap();
        let slide = scene.animation("slide").unwrap();
        assert!(scene.shape("ghost").is_none());

        assert_eq!(scene.stage.shapes().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(
            scene.stage.animation(slide).unwrap().state(),
            PlaybackState::Running
        );

        scene.stage.run(Duration::from_millis(16)).unwrap();
        for id in [a, b] {
            assert_eq!(scene.stage.attr(id, "x").unwrap(), PropertyValue::Number(100.0));
            assert_eq!(
                scene.stage.attr(id, "fillColor").unwrap(),
                PropertyValue::Color(Color::GREEN)
            );
        }
        assert_eq!(scene.stage.attr(b, "y").unwrap(), PropertyValue::Number(50.0));
    }

    #[test]
    fn load_without_autoplay_stays_idle() {
        let doc = parse(
            r#"{
              "shapes": [ { "name": "a", "type": "circle", "x": 0, "y": 0, "radius": 1 } ],
              "animations": [
                { "name": "slide", "duration": 100, "properties": { "x": 10 }, "subjects": ["a"] }
              ]
            }"#,
        );
        let mut scene = doc.load().unwrap();
        let slide = scene.animation("slide").unwrap();
        assert_eq!(
            scene.stage.animation(slide).unwrap().state(),
            PlaybackState::Idle
        );
        assert_eq!(scene.stage.run(Duration::from_millis(16)).unwrap(), 0);

        scene.stage.play(slide).unwrap();
        scene.stage.run(Duration::from_millis(16)).unwrap();
        let a = scene.shape("a").unwrap();
        assert_eq!(scene.stage.attr(a, "x").unwrap(), PropertyValue::Number(10.0));
    }

    #[test]
    fn bundled_demo_scene_loads() {
        let json = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../demos/neighbour.json"
        ));
        let mut scene = parse(json).load().unwrap();
        assert_eq!(scene.stage.len(), 3);
        let frames = scene.stage.run(Duration::from_millis(50)).unwrap();
        assert_eq!(frames, 30);
        let frame = scene.shape("frame").unwrap();
        assert_eq!(
            scene.stage.attr(frame, "opacity").unwrap(),
            PropertyValue::Number(0.25)
        );
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = parse(NEIGHBOUR);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(parse(&json), doc);
    }
}
