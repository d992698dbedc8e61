//! Built-in tables for the lodash 3 to 4 migration

/// Old name to new name
pub(crate) const RENAME: &[(&str, &str)] = &[
    ("all", "every"),
    ("any", "some"),
    ("backflow", "flowRight"),
    ("callback", "iteratee"),
    ("collect", "map"),
    ("compose", "flowRight"),
    ("contains", "includes"),
    ("createCallback", "iteratee"),
    ("detect", "find"),
    ("findWhere", "find"),
    ("first", "head"),
    ("foldl", "reduce"),
    ("foldr", "reduceRight"),
    ("include", "includes"),
    ("indexBy", "keyBy"),
    ("inject", "reduce"),
    ("invoke", "invokeMap"),
    ("methods", "functions"),
    ("modArgs", "overArgs"),
    ("object", "zipObject"),
    ("padLeft", "padStart"),
    ("padRight", "padEnd"),
    ("pairs", "toPairs"),
    ("pluck", "map"),
    ("rest", "tail"),
    ("restParam", "rest"),
    ("select", "filter"),
    ("sortByAll", "sortBy"),
    ("sortByOrder", "orderBy"),
    ("trimLeft", "trimStart"),
    ("trimRight", "trimEnd"),
    ("trunc", "truncate"),
    ("unique", "uniq"),
    ("where", "filter"),
];

/// Renames whose semantics changed too much for a notice to help
pub(crate) const IGNORE_RENAME: &[&str] = &["callback", "createCallback"];

/// Methods with non-deterministic or side-effect-only results
pub(crate) const IGNORE_RESULT: &[&str] = &[
    "bindAll",
    "debounce",
    "defer",
    "delay",
    "mixin",
    "noConflict",
    "now",
    "random",
    "runInContext",
    "sample",
    "shuffle",
    "throttle",
    "uniqueId",
];

/// Methods taking an iteration callback, with its argument position
pub(crate) const ITERATION: &[(&str, usize)] = &[
    ("each", 1),
    ("eachRight", 1),
    ("forEach", 1),
    ("forEachRight", 1),
    ("forIn", 1),
    ("forInRight", 1),
    ("forOwn", 1),
    ("forOwnRight", 1),
    ("times", 1),
];

/// Iteration methods whose output collects callback results
pub(crate) const RETURN_SENSITIVE: &[&str] = &["times"];

/// Methods defined on the wrapper prototype
pub(crate) const SEQUENCE: &[&str] = &[
    "commit", "concat", "next", "plant", "reverse", "run", "toJSON", "toString", "value",
    "valueOf",
];

/// Methods that return unwrapped values when called on a wrapper
pub(crate) const UNWRAPPED: &[&str] = &[
    "add",
    "attempt",
    "camelCase",
    "capitalize",
    "ceil",
    "clone",
    "cloneDeep",
    "deburr",
    "endsWith",
    "escape",
    "escapeRegExp",
    "every",
    "find",
    "findIndex",
    "findKey",
    "findLast",
    "findLastIndex",
    "findLastKey",
    "findWhere",
    "first",
    "floor",
    "get",
    "has",
    "identity",
    "includes",
    "indexOf",
    "inRange",
    "isArray",
    "isEmpty",
    "isEqual",
    "isNumber",
    "isString",
    "join",
    "kebabCase",
    "last",
    "lastIndexOf",
    "max",
    "min",
    "pad",
    "padLeft",
    "padRight",
    "parseInt",
    "reduce",
    "reduceRight",
    "repeat",
    "result",
    "round",
    "size",
    "snakeCase",
    "some",
    "sortedIndex",
    "startsWith",
    "sum",
    "template",
    "trim",
    "trimLeft",
    "trimRight",
    "trunc",
    "unescape",
    "words",
];

/// Aliases of the value-extraction method
pub(crate) const VALUE_ALIASES: &[&str] = &["run", "toJSON", "valueOf"];

/// Method whose wrapper form returns raw or wrapped results depending on call
pub(crate) const CONDITIONAL_WRAP: &str = "sample";
