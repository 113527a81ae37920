use assetforge::{ForgeError, ResolveError};

fn resolve_error(err: &anyhow::Error) -> Option<&ResolveError> {
    match err.downcast_ref::<ForgeError>() {
        Some(ForgeError::Resolve(resolve)) => Some(resolve),
        _ => err.downcast_ref::<ResolveError>(),
    }
}

pub fn format_error(err: &anyhow::Error) -> String {
    let Some(resolve) = resolve_error(err) else {
        return format!("[ERROR] {err}\n");
    };

    let fields = resolve.field_errors();
    if fields.is_empty() {
        let mut out = format!("[ERROR] {resolve}\n");
        let failing = resolve.failing_kinds();
        if !failing.is_empty() {
            let names: Vec<&str> = failing.iter().map(|k| k.as_str()).collect();
            out.push_str(&format!("  failing assets: {}\n", names.join(", ")));
        }
        return out;
    }

    let mut out = String::from("[ERROR] invalid install configuration\n");
    for (kind, field) in &fields {
        out.push_str(&format!("  [{kind}] {field}\n"));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let mut output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
        });
        if let Some(resolve) = resolve_error(err) {
            output["failing"] = serde_json::json!(resolve.failing_kinds());
            output["fields"] = resolve
                .field_errors()
                .iter()
                .map(|(kind, field)| {
                    serde_json::json!({
                        "kind": kind,
                        "field": field.field,
                        "message": field.message,
                    })
                })
                .collect();
        }
        let _ = crate::ui::json::emit(output);
        return;
    }

    eprint!("{}", format_error(err));
}
