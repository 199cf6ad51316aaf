use std::collections::{BTreeMap, BTreeSet};

use crate::animation::{check_targets_kind, resolve_targets};
use crate::document::{AnimationDef, SceneDocument};
use crate::error::KaguraError;
use crate::shape::ShapeKind;

/// 文書検証
pub trait Validate {
    /// 文書全体を検査し、全エラーを収集
    fn validate(&self) -> Result<(), Vec<KaguraError>>;
}

impl Validate for SceneDocument {
    fn validate(&self) -> Result<(), Vec<KaguraError>> {
        let mut errors = Vec::new();

        let mut kinds: BTreeMap<&str, ShapeKind> = BTreeMap::new();
        for def in &self.shapes {
            if kinds.insert(def.name.as_str(), def.geometry.kind()).is_some() {
                errors.push(KaguraError::DuplicateName(def.name.clone()));
            }
            if let Err(e) = def.to_shape() {
                errors.push(e);
            }
        }

        let mut animation_names = BTreeSet::new();
        for def in &self.animations {
            if !animation_names.insert(def.name.as_str()) {
                errors.push(KaguraError::DuplicateName(def.name.clone()));
            }
            validate_animation(def, &kinds, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_animation(
    def: &AnimationDef,
    kinds: &BTreeMap<&str, ShapeKind>,
    errors: &mut Vec<KaguraError>,
) {
    if let Err(e) = def.duration.resolve() {
        errors.push(e);
    }
    let targets = match resolve_targets(
        def.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone())),
    ) {
        Ok(targets) => Some(targets),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    for name in &def.subjects {
        let Some(kind) = kinds.get(name.as_str()) else {
            errors.push(KaguraError::UndefinedSubject {
                animation: def.name.clone(),
                name: name.clone(),
            });
            continue;
        };
        if let Some(targets) = &targets {
            if let Err(e) = check_targets_kind(targets, *kind) {
                errors.push(e);
            }
        }
    }
}
