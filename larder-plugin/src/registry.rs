//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use larder_core::{LarderError, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Central plugin registry
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => f.call(args, ctx),
            None => {
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = LarderError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use tools/list for the full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Metadata of every registered function, sorted by name
    pub fn function_metas(&self) -> Vec<FunctionMeta> {
        let mut metas: Vec<FunctionMeta> = self.functions.values().map(|f| f.meta()).collect();
        metas.sort_by(|a, b| a.name.cmp(b.name));
        metas
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared words between snake_case names
        let query_words: std::collections::HashSet<&str> = query.split('_').collect();
        let shared = candidate.split('_').filter(|w| query_words.contains(w)).count();
        score += shared * 20;

        score
    }

    pub fn help(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Value::Object(Self::function_to_help(f.meta())),
            None => Value::Error(LarderError::undefined_func(name)),
        }
    }

    fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
        let mut help = HashMap::new();
        help.insert("name".to_string(), Value::Text(meta.name.to_string()));
        help.insert("description".to_string(), Value::Text(meta.description.to_string()));
        help.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
        help.insert("returns".to_string(), Value::Text(meta.returns.to_string()));
        help.insert("category".to_string(), Value::Text(meta.category.to_string()));
        help.insert("args".to_string(), Value::List(
            meta.args.iter().map(|a| {
                let mut arg = HashMap::new();
                arg.insert("name".to_string(), Value::Text(a.name.to_string()));
                arg.insert("type".to_string(), Value::Text(a.typ.to_string()));
                arg.insert("description".to_string(), Value::Text(a.description.to_string()));
                arg.insert("optional".to_string(), Value::Bool(a.optional));
                Value::Object(arg)
            }).collect()
        ));
        help.insert("examples".to_string(), Value::List(
            meta.examples.iter().map(|e| Value::Text(e.to_string())).collect()
        ));
        help.insert("related".to_string(), Value::List(
            meta.related.iter().map(|r| Value::Text(r.to_string())).collect()
        ));
        help
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let funcs: Vec<Value> = self.function_metas()
            .into_iter()
            .filter(|meta| category.map_or(true, |c| meta.category == c))
            .map(|meta| {
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::Text(meta.name.to_string()));
                obj.insert("description".to_string(), Value::Text(meta.description.to_string()));
                obj.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
                obj.insert("category".to_string(), Value::Text(meta.category.to_string()));
                Value::Object(obj)
            })
            .collect();
        Value::List(funcs)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Echo;

    static ECHO_ARGS: [ArgMeta; 1] = [ArgMeta::required("value", "Number", "Value to echo")];

    impl FunctionPlugin for Echo {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "echo_value",
                description: "Return the argument unchanged",
                usage: "echo_value(value)",
                args: &ECHO_ARGS,
                returns: "Number",
                examples: &[],
                category: "test",
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            args.first().cloned().unwrap_or(Value::Null)
        }
    }

    fn ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    #[test]
    fn test_call_registered_function_case_insensitive() {
        let registry = PluginRegistry::new().with_function(Echo);
        let result = registry.call_function("ECHO_VALUE", &[Value::Number(2.0)], &ctx());
        assert_eq!(result, Value::Number(2.0));
    }

    #[test]
    fn test_unknown_function_suggests_similar() {
        let registry = PluginRegistry::new().with_function(Echo);
        match registry.call_function("echo", &[], &ctx()) {
            Value::Error(e) => {
                assert_eq!(e.code, "UNDEFINED_FUNC");
                assert!(e.suggestion.unwrap().contains("echo_value"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_help_and_listing() {
        let registry = PluginRegistry::new().with_function(Echo);
        let help = registry.help("echo_value");
        assert_eq!(help.get("usage"), Value::from("echo_value(value)"));
        assert!(registry.help("nope").is_error());

        assert_eq!(registry.list_functions(Some("test")).as_list().map(|l| l.len()), Some(1));
        assert_eq!(registry.list_functions(Some("units")).as_list().map(|l| l.len()), Some(0));
        assert_eq!(registry.function_metas()[0].required_args(), 1);
    }
}
