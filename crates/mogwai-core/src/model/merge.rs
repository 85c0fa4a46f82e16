use crate::{
    model::{CompiledModel, InstanceMember, ModelSurface, TypeMember, binding::bind_procedure},
    obs::sink::{self, MetricsEvent},
    procedure::ProcedureMap,
    schema::Schema,
};
use std::sync::Arc;

/// Copy schema methods onto the instance side and statics onto the type.
pub fn merge_schema(target: &mut CompiledModel, schema: &Schema) {
    for (name, f) in &schema.methods {
        target
            .methods
            .insert(name.clone(), InstanceMember::Method(Arc::clone(f)));
    }

    for (name, f) in &schema.statics {
        target
            .statics
            .insert(name.clone(), TypeMember::Static(Arc::clone(f)));
    }
}

/// Attach one accessor per procedure on both surfaces.
///
/// Runs after [`merge_schema`]; a procedure replaces any schema member of the
/// same name; each replacement is recorded as a shadowing event.
pub fn attach_procedures(target: &mut CompiledModel, procedures: ProcedureMap) {
    for (name, procedure) in procedures {
        let accessor = bind_procedure(procedure);

        let on_type = target
            .statics
            .insert(name.clone(), TypeMember::Procedure(accessor.clone()));
        let on_instance = target
            .methods
            .insert(name.clone(), InstanceMember::Procedure(accessor));

        sink::record(MetricsEvent::ProcedureBound {
            type_tag: target.type_tag(),
            procedure: &name,
        });

        if on_type.is_some() || on_instance.is_some() {
            sink::record(MetricsEvent::ProcedureShadowing {
                type_tag: target.type_tag(),
                name: &name,
            });
        }
    }
}
