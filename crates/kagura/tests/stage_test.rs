//! Shape construction, attributes, stage membership and rendering

use kagura::*;

fn number(v: PropertyValue) -> f64 {
    v.as_number().expect("number property")
}

// =============================================================
// シェイプ（ステージ外）
// =============================================================

mod shape_tests {
    use super::*;

    #[test]
    fn circle_defaults() {
        let shape = Shape::circle(10.0, 20.0, 5.0);
        assert_eq!(shape.kind(), ShapeKind::Circle);
        assert_eq!(number(shape.get("x").unwrap()), 10.0);
        assert_eq!(number(shape.get("y").unwrap()), 20.0);
        assert_eq!(number(shape.get("radius").unwrap()), 5.0);
        assert_eq!(number(shape.get("opacity").unwrap()), 1.0);
        assert_eq!(number(shape.get("rotation").unwrap()), 0.0);
        assert_eq!(
            shape.get("fillColor").unwrap(),
            PropertyValue::Color(Color::BLACK)
        );
        assert_eq!(
            shape.get("strokeColor").unwrap(),
            PropertyValue::Color(Color::TRANSPARENT)
        );
    }

    #[test]
    fn attr_chains() {
        let shape = Shape::rect(0.0, 0.0, 10.0, 20.0)
            .attr("fillColor", "red")
            .unwrap()
            .attr("width", 30.0)
            .unwrap()
            .attr("rotation", 45.0)
            .unwrap();
        assert_eq!(shape.style.fill, Color::RED);
        assert_eq!(number(shape.get("width").unwrap()), 30.0);
        assert_eq!(number(shape.get("height").unwrap()), 20.0);
        assert!((number(shape.get("rotation").unwrap()) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn attr_rejects_properties_of_other_variants() {
        let err = Shape::circle(0.0, 0.0, 1.0).attr("width", 10.0).unwrap_err();
        assert!(matches!(
            err,
            KaguraError::InvalidProperty { ref name, shape } if name == "width" && shape == "circle"
        ));
        assert!(matches!(
            Shape::rect(0.0, 0.0, 1.0, 1.0).attr("radius", 1.0),
            Err(KaguraError::InvalidProperty { .. })
        ));
        assert!(matches!(
            Shape::ellipse(0.0, 0.0, 1.0, 2.0).get("radius"),
            Err(KaguraError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn attr_rejects_unknown_names() {
        assert!(matches!(
            Shape::circle(0.0, 0.0, 1.0).attr("colour", "red"),
            Err(KaguraError::InvalidProperty { ref name, .. }) if name == "colour"
        ));
    }

    #[test]
    fn attr_rejects_bad_values() {
        let circle = || Shape::circle(0.0, 0.0, 1.0);
        assert!(matches!(
            circle().attr("fillColor", "#12345"),
            Err(KaguraError::InvalidColor(_))
        ));
        assert!(matches!(
            circle().attr("fillColor", 3.0),
            Err(KaguraError::TypeMismatch { .. })
        ));
        assert!(matches!(
            circle().attr("x", "left"),
            Err(KaguraError::TypeMismatch { .. })
        ));
        assert!(matches!(
            circle().attr("opacity", -0.1),
            Err(KaguraError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            circle().attr("radius", -1.0),
            Err(KaguraError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn constructors_sanitise_non_finite_input() {
        let circle = Shape::circle(f64::NAN, f64::INFINITY, f64::NAN);
        assert_eq!(number(circle.get("x").unwrap()), 0.0);
        assert_eq!(number(circle.get("y").unwrap()), f64::MAX);
        assert_eq!(number(circle.get("radius").unwrap()), 0.0);

        let rect = Shape::rect(f64::NEG_INFINITY, 1.0, f64::INFINITY, -3.0);
        assert_eq!(number(rect.get("x").unwrap()), f64::MIN);
        assert_eq!(number(rect.get("width").unwrap()), f64::MAX);
        assert_eq!(number(rect.get("height").unwrap()), 0.0);

        let ellipse = Shape::ellipse(2.0, 3.0, -1.0, f64::NAN);
        assert_eq!(number(ellipse.get("radiusX").unwrap()), 0.0);
        assert_eq!(number(ellipse.get("radiusY").unwrap()), 0.0);

        // 丸めた値は attr の検査も通る範囲
        assert!(circle.attr("x", 0.0).is_ok());
    }

    #[test]
    fn ellipse_radii() {
        let shape = Shape::ellipse(0.0, 0.0, 3.0, 4.0)
            .attr("radiusY", 8.0)
            .unwrap();
        assert_eq!(number(shape.get("radiusX").unwrap()), 3.0);
        assert_eq!(number(shape.get("radiusY").unwrap()), 8.0);
    }

    #[test]
    fn bounds_follow_anchor() {
        let circle = Shape::circle(0.0, 0.0, 50.0).bounds();
        assert_eq!((circle.min.x, circle.min.y), (-50.0, -50.0));
        assert_eq!((circle.max.x, circle.max.y), (50.0, 50.0));

        let rect = Shape::rect(10.0, 20.0, 30.0, 40.0).bounds();
        assert_eq!((rect.min.x, rect.min.y), (10.0, 20.0));
        assert_eq!((rect.max.x, rect.max.y), (40.0, 60.0));
    }
}

// =============================================================
// ステージへの登録
// =============================================================

mod stage_tests {
    use super::*;

    #[test]
    fn add_to_returns_chaining_handle() {
        let mut stage = Stage::new();
        let a = Shape::circle(0.0, 0.0, 50.0)
            .add_to(&mut stage)
            .attr("fillColor", "red")
            .unwrap()
            .id();
        assert!(stage.contains(a));
        assert_eq!(
            stage.attr(a, "fillColor").unwrap(),
            PropertyValue::Color(Color::RED)
        );
    }

    #[test]
    fn insertion_order_is_z_order() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(0.0, 0.0, 1.0));
        let b = stage.add(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let c = stage.add(Shape::ellipse(0.0, 0.0, 1.0, 1.0));
        assert_eq!(stage.shapes().collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(stage.len(), 3);
    }

    #[test]
    fn attach_is_idempotent() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(0.0, 0.0, 1.0));
        assert!(!stage.attach(a).unwrap());
        assert_eq!(stage.len(), 1);

        assert!(stage.detach(a));
        assert!(!stage.contains(a));
        assert!(!stage.detach(a));
        assert!(stage.attach(a).unwrap());
        assert!(!stage.attach(a).unwrap());
        assert_eq!(stage.len(), 1);
    }

    #[test]
    fn reattached_shape_moves_to_front() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(0.0, 0.0, 1.0));
        let b = stage.add(Shape::circle(0.0, 0.0, 1.0));
        stage.detach(a);
        stage.attach(a).unwrap();
        assert_eq!(stage.shapes().collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn remove_destroys_shape() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(5.0, 0.0, 1.0));
        let removed = stage.remove(a).unwrap();
        assert_eq!(removed.placement.position.x, 5.0);
        assert!(stage.is_empty());
        assert!(stage.shape(a).is_none());
        assert!(matches!(
            stage.attr(a, "x"),
            Err(KaguraError::ShapeNotFound(id)) if id == a
        ));
        assert!(matches!(stage.attach(a), Err(KaguraError::ShapeNotFound(_))));
        assert!(stage.remove(a).is_none());
    }

    #[test]
    fn set_attr_on_detached_shape() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(0.0, 0.0, 1.0));
        stage.detach(a);
        stage.set_attr(a, "x", 42.0).unwrap();
        assert_eq!(number(stage.attr(a, "x").unwrap()), 42.0);
    }

    #[test]
    fn shape_mut_handle() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(0.0, 0.0, 1.0));
        let mut handle = stage.shape_mut(a).unwrap();
        assert!(handle.detach());
        assert!(handle.attach().unwrap());
        let handle = handle.attr("strokeWidth", 2.0).unwrap();
        assert_eq!(number(handle.get("strokeWidth").unwrap()), 2.0);

        stage.remove(a);
        assert!(stage.shape_mut(a).is_none());
    }
}

// =============================================================
// 描画
// =============================================================

mod render_tests {
    use super::*;

    #[test]
    fn render_skips_detached_shapes() {
        let mut stage = Stage::new();
        let a = stage.add(Shape::circle(0.0, 0.0, 50.0));
        let b = stage.add(Shape::circle(0.0, 50.0, 50.0));
        stage.detach(b);

        let mut recorder = FrameRecorder::new();
        stage.render(&mut recorder);
        let frame = recorder.last().unwrap();
        assert_eq!(frame.number, 0);
        assert_eq!(frame.shapes.len(), 1);
        assert_eq!(frame.shapes[0].id, a);
        assert_eq!(frame.shapes[0].kind, ShapeKind::Circle);
    }

    #[test]
    fn closure_sink() {
        let mut stage = Stage::new();
        stage.add(Shape::circle(0.0, 0.0, 1.0));
        stage.add(Shape::rect(0.0, 0.0, 1.0, 1.0));
        let mut seen = 0;
        stage.render(&mut |frame: &Frame| seen += frame.shapes.len());
        assert_eq!(seen, 2);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut stage = Stage::new();
        Shape::circle(0.0, 0.0, 50.0)
            .add_to(&mut stage)
            .attr("fillColor", "red")
            .unwrap();
        let mut recorder = FrameRecorder::new();
        stage.render(&mut recorder);

        let json = serde_json::to_value(recorder.last().unwrap()).unwrap();
        let shape = &json["shapes"][0];
        assert_eq!(shape["kind"], "circle");
        assert_eq!(shape["style"]["fill"], "#ff0000ff");
        assert_eq!(shape["geometry"]["type"], "circle");
        assert_eq!(shape["geometry"]["radius"], 50.0);
    }
}
