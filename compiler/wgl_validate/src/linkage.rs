//! Cross-stage consistency of interface variables.

use std::cmp::Ordering;

use wgl_diagnostic::{Diagnostic, ErrorCode};

use crate::variables::{compare_owned, Ownership, ShaderVariable, ShaderVariables, VariableKind};

/// Check that a vertex and a fragment shader agree on their interface.
///
/// Both tables must be `Owned`. Returns the linkage diagnostics; a program
/// links when none of them is an error.
#[tracing::instrument(level = "debug", skip_all)]
pub fn validate_linkage(vertex: &ShaderVariables, fragment: &ShaderVariables) -> Vec<Diagnostic> {
    if vertex.ownership() != Ownership::Owned || fragment.ownership() != Ownership::Owned {
        return vec![Diagnostic::error(ErrorCode::E9001)
            .with_message("linkage needs owned shader variables")];
    }

    let mut diagnostics = Vec::new();
    for kind in [
        VariableKind::Uniform,
        VariableKind::Varying,
        VariableKind::Attribute,
    ] {
        check_consistency(kind, vertex.list(kind), fragment.list(kind), &mut diagnostics);
    }
    check_alias_overlap(vertex, fragment, &mut diagnostics);
    check_alias_overlap(fragment, vertex, &mut diagnostics);
    check_varyings_written(vertex.varyings(), fragment.varyings(), &mut diagnostics);

    tracing::debug!(count = diagnostics.len(), "linkage checked");
    diagnostics
}

fn incompatible_code(kind: VariableKind) -> ErrorCode {
    match kind {
        VariableKind::Uniform => ErrorCode::E3001,
        VariableKind::Varying => ErrorCode::E3002,
        VariableKind::Attribute => ErrorCode::E3003,
    }
}

fn name_of(variable: &ShaderVariable) -> &str {
    variable.name.as_owned().unwrap_or_default()
}

/// Walk two name-sorted lists in step, comparing the types of shared names.
fn check_consistency(
    kind: VariableKind,
    first: &[ShaderVariable],
    second: &[ShaderVariable],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut rest = second;
    for a in first {
        while let Some((b, tail)) = rest.split_first() {
            if compare_owned(b, a) == Ordering::Less {
                rest = tail;
            } else {
                break;
            }
        }
        let Some((b, tail)) = rest.split_first() else {
            return;
        };
        if compare_owned(a, b) == Ordering::Equal {
            if a.ty != b.ty {
                diagnostics.push(
                    Diagnostic::error(incompatible_code(kind))
                        .with_message(format!(
                            "{} `{}` is declared as `{}` in one shader and as `{}` in the other",
                            kind.as_str(),
                            name_of(a),
                            a.ty,
                            b.ty
                        )),
                );
            }
            rest = tail;
        }
    }
}

/// Two different names must never share a generated alias.
fn check_alias_overlap(
    own: &ShaderVariables,
    other: &ShaderVariables,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for kind in [VariableKind::Uniform, VariableKind::Varying] {
        for v in own.list(kind) {
            let Some(alias) = &v.alias_name else {
                continue;
            };
            let clashes = own
                .uniforms()
                .iter()
                .chain(own.varyings())
                .chain(other.uniforms())
                .chain(other.varyings())
                .filter(|u| u.alias_name.as_ref() == Some(alias) && u.name != v.name);
            for u in clashes {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E3004).with_message(format!(
                        "`{}` and `{}` map to the same generated name `{}`",
                        name_of(v),
                        name_of(u),
                        alias.as_owned().unwrap_or_default()
                    )),
                );
            }
        }
    }
}

fn check_varyings_written(
    vertex: &[ShaderVariable],
    fragment: &[ShaderVariable],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for varying in fragment {
        let written = vertex
            .binary_search_by(|entry| compare_owned(entry, varying))
            .is_ok_and(|at| vertex[at].static_write);
        if !written {
            diagnostics.push(
                Diagnostic::warning(ErrorCode::E3005).with_message(format!(
                    "varying `{}` is read by the fragment shader but never written by the vertex shader",
                    name_of(varying)
                )),
            );
        }
    }
}
