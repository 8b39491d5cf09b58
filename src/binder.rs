//! Binder strategies: generic per-call materialization vs. cached plans.
//!
//! Both strategies sit behind the [`Binder`] contract and must produce
//! identical results for every supported shape. [`GenericBinder`] walks the
//! type descriptor on every call. [`CompiledBinder`] resolves a
//! [`BindingPlan`] once per `(type name, parameter count)` pair and caches
//! it process-wide; later calls skip descriptor re-derivation.
//!
//! Known, deliberate gap: a constructor with a list-of-composite parameter
//! is not compiled. `compile` marks such types as fallback and the compiled
//! binder routes them through the generic materializer, so behavior stays
//! identical — specialization is simply skipped where the plan would be
//! incomplete.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::descriptor::{Args, DescriptorFn, ElemKind, Field, ParamKind, ScalarFn, TypeDescriptor};
use crate::error::Error;
use crate::materialize::{absent, materialize};
use crate::value::Value;

/// Turns a parsed mapping into an erased instance of the described type.
pub trait Binder {
    fn bind_erased(&self, value: &Value, desc: &'static TypeDescriptor) -> Result<Field, Error>;
}

/// The always-correct strategy: materializes straight from the descriptor
/// on every invocation.
#[derive(Default)]
pub struct GenericBinder;

impl Binder for GenericBinder {
    fn bind_erased(&self, value: &Value, desc: &'static TypeDescriptor) -> Result<Field, Error> {
        materialize(value, desc)
    }
}

/// One resolved step of a binding plan.
struct PlanStep {
    /// Index of the backing parameter in the descriptor.
    param: usize,
    op: PlanOp,
}

/// The shape-specific action resolved at compile time.
enum PlanOp {
    /// Scalar text through the parameter's converter or coercion.
    Scalar,
    /// Nested mapping through the composite's own (lazily compiled) plan.
    Composite(DescriptorFn),
    /// Nested sequence of independently coerced scalars.
    ScalarList(ScalarFn),
}

/// A type-specific recipe for turning a mapping into an instance without
/// re-deriving the descriptor on each call.
pub(crate) struct BindingPlan {
    desc: &'static TypeDescriptor,
    steps: Vec<PlanStep>,
}

/// Compilation outcome kept in the cache: either a usable plan, or the
/// recorded decision to fall back for this type.
enum CachedPlan {
    Plan(BindingPlan),
    Fallback(&'static TypeDescriptor),
}

/// Compile a plan for the descriptor, or record the fallback decision when
/// a parameter's kind is a list of composites.
fn compile(desc: &'static TypeDescriptor) -> CachedPlan {
    let mut steps = Vec::with_capacity(desc.params().len());
    for (index, param) in desc.params().iter().enumerate() {
        let op = match param.kind {
            ParamKind::Scalar => PlanOp::Scalar,
            ParamKind::Composite(nested) => PlanOp::Composite(nested),
            ParamKind::List(ElemKind::Scalar(parse)) => PlanOp::ScalarList(parse),
            ParamKind::List(ElemKind::Composite(_)) => return CachedPlan::Fallback(desc),
        };
        steps.push(PlanStep { param: index, op });
    }
    CachedPlan::Plan(BindingPlan { desc, steps })
}

impl BindingPlan {
    /// Execute the plan. Mirrors the materializer parameter loop with the
    /// kind dispatch already resolved; nested composites fetch their own
    /// plans from the cache at bind time, which is also what keeps
    /// recursive types from recursing at compile time.
    fn run(&self, value: &Value, cache: &PlanCache) -> Result<Field, Error> {
        let type_name = self.desc.type_name();
        if !matches!(value, Value::Mapping(_)) {
            return Err(Error::coercion(
                type_name,
                "",
                format!("expected a mapping block, found a {}", value.kind_name()),
            ));
        }
        let mut args = Args::new(type_name, self.steps.len());
        for step in &self.steps {
            let param = &self.desc.params()[step.param];
            let field = match value.get(param.key) {
                None => absent(param, type_name)?,
                Some(Value::Scalar(s)) => {
                    let bound = match &param.converter {
                        Some(converter) => converter.apply(s).and_then(|f| (param.wrap)(f)),
                        None => (param.from_scalar)(s),
                    };
                    bound.map_err(|detail| Error::coercion(type_name, param.key, detail))?
                }
                Some(nested @ Value::Mapping(_)) => match step.op {
                    PlanOp::Composite(desc) => {
                        let instance = cache.bind(nested, desc())?;
                        (param.wrap)(instance)
                            .map_err(|detail| Error::coercion(type_name, param.key, detail))?
                    }
                    _ => {
                        return Err(Error::coercion(
                            type_name,
                            param.key,
                            "unexpected nested mapping for a non-composite parameter",
                        ));
                    }
                },
                Some(Value::Sequence(items)) => match step.op {
                    PlanOp::ScalarList(parse) => {
                        let mut fields = Vec::with_capacity(items.len());
                        for item in items {
                            let Some(s) = item.as_scalar() else {
                                return Err(Error::coercion(
                                    type_name,
                                    param.key,
                                    format!(
                                        "list elements must be scalars, found a {}",
                                        item.kind_name()
                                    ),
                                ));
                            };
                            fields.push(
                                parse(s)
                                    .map_err(|d| Error::coercion(type_name, param.key, d))?,
                            );
                        }
                        let Some(collect) = param.collect else {
                            return Err(Error::coercion(
                                type_name,
                                param.key,
                                "parameter does not accept a sequence",
                            ));
                        };
                        collect(fields)
                            .map_err(|detail| Error::coercion(type_name, param.key, detail))?
                    }
                    _ => {
                        return Err(Error::coercion(
                            type_name,
                            param.key,
                            "unexpected sequence for a non-list parameter",
                        ));
                    }
                },
            };
            args.push(param.name, field);
        }
        self.desc.construct(&mut args)
    }
}

/// Cache key per the strategy contract: type name plus constructor arity.
type PlanKey = (&'static str, usize);

/// The process-wide store of compiled binding plans.
///
/// Populated lazily on first use, read by all callers, invalidated only by
/// an explicit [`clear`](PlanCache::clear). Population is serialized behind
/// a mutex so the cache stays sound if callers ever bind from multiple
/// threads.
pub struct PlanCache {
    plans: Mutex<HashMap<PlanKey, Arc<CachedPlan>, ahash::RandomState>>,
}

impl PlanCache {
    /// An empty, private cache. Useful for tests that observe the cache
    /// lifecycle without touching the process-wide instance.
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(HashMap::default()),
        }
    }

    /// The process-wide cache used by [`CompiledBinder::new`].
    pub fn global() -> &'static PlanCache {
        static GLOBAL: OnceLock<PlanCache> = OnceLock::new();
        GLOBAL.get_or_init(PlanCache::new)
    }

    /// Drop every cached plan. The next bind recompiles lazily.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached entries (including recorded fallback decisions).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PlanKey, Arc<CachedPlan>, ahash::RandomState>> {
        self.plans.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get_or_compile(&self, desc: &'static TypeDescriptor) -> Arc<CachedPlan> {
        let key = (desc.type_name(), desc.params().len());
        let mut plans = self.lock();
        plans.entry(key).or_insert_with(|| Arc::new(compile(desc))).clone()
    }

    /// Bind through the cached plan for `desc`, compiling it first if this
    /// is the type's first use.
    fn bind(&self, value: &Value, desc: &'static TypeDescriptor) -> Result<Field, Error> {
        match &*self.get_or_compile(desc) {
            CachedPlan::Plan(plan) => plan.run(value, self),
            CachedPlan::Fallback(desc) => materialize(value, desc),
        }
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The specialized strategy: per-type binding plans, compiled on first use
/// and cached across calls.
pub struct CompiledBinder {
    cache: &'static PlanCache,
}

impl CompiledBinder {
    /// A binder over the process-wide plan cache.
    pub fn new() -> Self {
        Self {
            cache: PlanCache::global(),
        }
    }

    /// A binder over a caller-owned cache.
    pub fn with_cache(cache: &'static PlanCache) -> Self {
        Self { cache }
    }
}

impl Default for CompiledBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder for CompiledBinder {
    fn bind_erased(&self, value: &Value, desc: &'static TypeDescriptor) -> Result<Field, Error> {
        self.cache.bind(value, desc)
    }
}
