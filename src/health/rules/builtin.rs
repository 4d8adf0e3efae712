//! Built-in migration rule table.
//!
//! Each entry describes the upgrade from `from_major` to `to_major` for a
//! framework and the source patterns that are known to break or be deprecated
//! by it. Patterns are tested line by line.

use crate::health::domain::IssueSeverity;

pub(super) struct PatternSpec {
    pub regex: &'static str,
    pub extensions: &'static [&'static str],
    pub severity: IssueSeverity,
    pub message: &'static str,
    pub hint: &'static str,
}

pub(super) struct RuleSpec {
    pub framework: &'static str,
    pub from_major: u64,
    pub to_major: u64,
    pub guide_url: &'static str,
    pub patterns: &'static [PatternSpec],
}

const SVELTE: &[&str] = &["svelte"];
const SVELTE_SCRIPTS: &[&str] = &["svelte", "js", "ts"];
const SCRIPTS: &[&str] = &["js", "ts"];
const JSX: &[&str] = &["js", "jsx", "ts", "tsx"];
const VUE: &[&str] = &["vue", "js", "ts"];
const STYLES: &[&str] = &["css", "scss", "pcss", "postcss"];
const MARKUP: &[&str] = &["html", "svelte", "vue", "jsx", "tsx", "astro"];

use IssueSeverity::{Breaking, Deprecated, Recommended};

pub(super) const RULES: &[RuleSpec] = &[
    RuleSpec {
        framework: "svelte",
        from_major: 4,
        to_major: 5,
        guide_url: "https://svelte.dev/docs/svelte/v5-migration-guide",
        patterns: &[
            PatternSpec {
                regex: r"export\s+let\s+\w+",
                extensions: SVELTE,
                severity: Breaking,
                message: "`export let` props are replaced by runes in Svelte 5",
                hint: "Declare props with `let { foo } = $props();`",
            },
            PatternSpec {
                regex: r"\$\$(props|restProps)",
                extensions: SVELTE,
                severity: Breaking,
                message: "`$$props` and `$$restProps` are not available in runes mode",
                hint: "Collect remaining props with `let { ...rest } = $props();`",
            },
            PatternSpec {
                regex: r"new\s+[A-Z]\w*\(\s*\{\s*target",
                extensions: SCRIPTS,
                severity: Breaking,
                message: "Components are no longer classes in Svelte 5",
                hint: "Use `mount(Component, { target })` from 'svelte'",
            },
            PatternSpec {
                regex: r"\bon:[a-z]+",
                extensions: SVELTE,
                severity: Deprecated,
                message: "Event directives (`on:event`) are deprecated",
                hint: "Use event attributes such as `onclick={handler}`",
            },
            PatternSpec {
                regex: r"^\s*\$:",
                extensions: SVELTE,
                severity: Deprecated,
                message: "Reactive `$:` statements are replaced by runes",
                hint: "Use `$derived(...)` for values and `$effect(...)` for side effects",
            },
            PatternSpec {
                regex: r"\bcreateEventDispatcher\b",
                extensions: SVELTE_SCRIPTS,
                severity: Deprecated,
                message: "`createEventDispatcher` is deprecated",
                hint: "Accept callback props instead of dispatching events",
            },
            PatternSpec {
                regex: r"<slot\b",
                extensions: SVELTE,
                severity: Deprecated,
                message: "Slots are replaced by snippets",
                hint: "Render children with `{@render children()}`",
            },
            PatternSpec {
                regex: r"\b(beforeUpdate|afterUpdate)\b",
                extensions: SVELTE_SCRIPTS,
                severity: Deprecated,
                message: "`beforeUpdate`/`afterUpdate` are deprecated",
                hint: "Use `$effect.pre(...)` and `$effect(...)`",
            },
        ],
    },
    RuleSpec {
        framework: "react",
        from_major: 17,
        to_major: 18,
        guide_url: "https://react.dev/blog/2022/03/08/react-18-upgrade-guide",
        patterns: &[
            PatternSpec {
                regex: r"ReactDOM\.render\(",
                extensions: JSX,
                severity: Breaking,
                message: "`ReactDOM.render` is replaced by `createRoot` in React 18",
                hint: "const root = createRoot(container); root.render(<App />);",
            },
            PatternSpec {
                regex: r"ReactDOM\.hydrate\(",
                extensions: JSX,
                severity: Breaking,
                message: "`ReactDOM.hydrate` is replaced by `hydrateRoot`",
                hint: "hydrateRoot(container, <App />);",
            },
            PatternSpec {
                regex: r"\bunmountComponentAtNode\(",
                extensions: JSX,
                severity: Deprecated,
                message: "`unmountComponentAtNode` is deprecated",
                hint: "Call `root.unmount()` on the root returned by `createRoot`",
            },
            PatternSpec {
                regex: r"\brenderToNodeStream\(",
                extensions: JSX,
                severity: Deprecated,
                message: "`renderToNodeStream` is deprecated",
                hint: "Use `renderToPipeableStream`",
            },
        ],
    },
    RuleSpec {
        framework: "react",
        from_major: 18,
        to_major: 19,
        guide_url: "https://react.dev/blog/2024/04/25/react-19-upgrade-guide",
        patterns: &[
            PatternSpec {
                regex: r"ReactDOM\.(render|hydrate)\(",
                extensions: JSX,
                severity: Breaking,
                message: "`ReactDOM.render`/`hydrate` are removed in React 19",
                hint: "Use `createRoot` / `hydrateRoot` from 'react-dom/client'",
            },
            PatternSpec {
                regex: r"\.propTypes\s*=",
                extensions: JSX,
                severity: Breaking,
                message: "propTypes checks are removed in React 19",
                hint: "Use TypeScript or a runtime validation library",
            },
            PatternSpec {
                regex: r"\.defaultProps\s*=",
                extensions: JSX,
                severity: Breaking,
                message: "`defaultProps` is removed for function components",
                hint: "Use ES6 default parameters in the props destructuring",
            },
            PatternSpec {
                regex: r#"\bref=["']"#,
                extensions: JSX,
                severity: Breaking,
                message: "String refs are removed in React 19",
                hint: "Use `useRef` or callback refs",
            },
            PatternSpec {
                regex: r"\buseFormState\b",
                extensions: JSX,
                severity: Deprecated,
                message: "`useFormState` is renamed",
                hint: "Use `useActionState` from 'react'",
            },
            PatternSpec {
                regex: r"\bforwardRef\(",
                extensions: JSX,
                severity: Recommended,
                message: "`ref` is a regular prop for function components in React 19",
                hint: "Accept `ref` as a prop instead of wrapping in `forwardRef`",
            },
        ],
    },
    RuleSpec {
        framework: "vue",
        from_major: 2,
        to_major: 3,
        guide_url: "https://v3-migration.vuejs.org/",
        patterns: &[
            PatternSpec {
                regex: r"new\s+Vue\(",
                extensions: VUE,
                severity: Breaking,
                message: "`new Vue()` is replaced by `createApp()`",
                hint: "const app = createApp(App); app.mount('#app');",
            },
            PatternSpec {
                regex: r"Vue\.(component|use|mixin|directive)\(",
                extensions: VUE,
                severity: Breaking,
                message: "Global API moved to the application instance",
                hint: "Call `app.component(...)`, `app.use(...)` on the createApp() result",
            },
            PatternSpec {
                regex: r"\$(on|off|once)\(",
                extensions: VUE,
                severity: Breaking,
                message: "Instance event emitter methods are removed",
                hint: "Use an external emitter such as mitt",
            },
            PatternSpec {
                regex: r"\$listeners",
                extensions: VUE,
                severity: Breaking,
                message: "`$listeners` is merged into `$attrs`",
                hint: "Read listeners from `$attrs`",
            },
            PatternSpec {
                regex: r"\bfilters\s*:",
                extensions: VUE,
                severity: Breaking,
                message: "Filters are removed in Vue 3",
                hint: "Replace filters with methods or computed properties",
            },
            PatternSpec {
                regex: r"v-on:[\w-]+\.native|@[\w-]+\.native",
                extensions: &["vue"],
                severity: Breaking,
                message: "The `.native` modifier is removed",
                hint: "Declare emitted events with `emits` instead",
            },
            PatternSpec {
                regex: r"\b(beforeDestroy|destroyed)\s*\(",
                extensions: VUE,
                severity: Deprecated,
                message: "Lifecycle hooks were renamed",
                hint: "Use `beforeUnmount` / `unmounted`",
            },
        ],
    },
    RuleSpec {
        framework: "next",
        from_major: 13,
        to_major: 14,
        guide_url: "https://nextjs.org/docs/app/building-your-application/upgrading/version-14",
        patterns: &[
            PatternSpec {
                regex: r#"from\s+["']@next/font"#,
                extensions: JSX,
                severity: Breaking,
                message: "`@next/font` is removed",
                hint: "Import from 'next/font' instead",
            },
            PatternSpec {
                regex: r"next export",
                extensions: &["json"],
                severity: Breaking,
                message: "`next export` command is removed",
                hint: "Set `output: 'export'` in next.config.js",
            },
            PatternSpec {
                regex: r"\bImageResponse\b.*next/server",
                extensions: JSX,
                severity: Deprecated,
                message: "`ImageResponse` moved out of next/server",
                hint: "Import `ImageResponse` from 'next/og'",
            },
        ],
    },
    RuleSpec {
        framework: "next",
        from_major: 14,
        to_major: 15,
        guide_url: "https://nextjs.org/docs/app/building-your-application/upgrading/version-15",
        patterns: &[
            PatternSpec {
                regex: r"\b(cookies|headers|draftMode)\(\)\.",
                extensions: JSX,
                severity: Breaking,
                message: "Request APIs are asynchronous in Next.js 15",
                hint: "Await the call first: `(await cookies()).get(...)`",
            },
            PatternSpec {
                regex: r"experimental-edge",
                extensions: JSX,
                severity: Breaking,
                message: "`experimental-edge` runtime value is removed",
                hint: "Use `export const runtime = 'edge'`",
            },
            PatternSpec {
                regex: r"\buseFormState\b",
                extensions: JSX,
                severity: Deprecated,
                message: "`useFormState` is deprecated with React 19",
                hint: "Use `useActionState` from 'react'",
            },
        ],
    },
    RuleSpec {
        framework: "angular",
        from_major: 16,
        to_major: 17,
        guide_url: "https://angular.dev/update-guide",
        patterns: &[PatternSpec {
            regex: r"\*ng(If|For|Switch)\b",
            extensions: &["html", "ts"],
            severity: Recommended,
            message: "Structural directives have built-in control flow equivalents",
            hint: "Migrate with `ng generate @angular/core:control-flow` to `@if` / `@for`",
        }],
    },
    RuleSpec {
        framework: "tailwindcss",
        from_major: 3,
        to_major: 4,
        guide_url: "https://tailwindcss.com/docs/upgrade-guide",
        patterns: &[
            PatternSpec {
                regex: r"@tailwind\s+(base|components|utilities)",
                extensions: STYLES,
                severity: Breaking,
                message: "`@tailwind` directives are removed in Tailwind CSS 4",
                hint: "Replace them with `@import \"tailwindcss\";`",
            },
            PatternSpec {
                regex: r"\b(bg|text|border|divide|ring|placeholder)-opacity-\d+",
                extensions: MARKUP,
                severity: Deprecated,
                message: "Opacity utilities are removed",
                hint: "Use opacity modifiers such as `bg-black/50`",
            },
            PatternSpec {
                regex: r"\b(flex-shrink|flex-grow)-\d",
                extensions: MARKUP,
                severity: Deprecated,
                message: "`flex-shrink-*`/`flex-grow-*` are renamed",
                hint: "Use `shrink-*` / `grow-*`",
            },
        ],
    },
    RuleSpec {
        framework: "express",
        from_major: 4,
        to_major: 5,
        guide_url: "https://expressjs.com/en/guide/migrating-5.html",
        patterns: &[
            PatternSpec {
                regex: r"\bapp\.del\(",
                extensions: SCRIPTS,
                severity: Breaking,
                message: "`app.del()` is removed in Express 5",
                hint: "Use `app.delete()`",
            },
            PatternSpec {
                regex: r"\breq\.param\(",
                extensions: SCRIPTS,
                severity: Breaking,
                message: "`req.param()` is removed in Express 5",
                hint: "Read from `req.params`, `req.body` or `req.query` explicitly",
            },
            PatternSpec {
                regex: r"\bres\.sendfile\(",
                extensions: SCRIPTS,
                severity: Breaking,
                message: "`res.sendfile()` is removed in Express 5",
                hint: "Use `res.sendFile()`",
            },
            PatternSpec {
                regex: r"\bres\.send\(\s*\d{3}\s*\)",
                extensions: SCRIPTS,
                severity: Breaking,
                message: "`res.send(status)` is removed in Express 5",
                hint: "Use `res.sendStatus(status)`",
            },
            PatternSpec {
                regex: r#"\.(get|post|put|delete|use|all)\(\s*["'][^"']*\*"#,
                extensions: SCRIPTS,
                severity: Breaking,
                message: "Wildcard route syntax changed in path-to-regexp 8",
                hint: "Name wildcards explicitly, e.g. `/*splat`",
            },
        ],
    },
];

/// Alias -> canonical framework name
pub(super) const ALIASES: &[(&str, &str)] = &[
    ("sveltekit", "svelte"),
    ("svelte-kit", "svelte"),
    ("@sveltejs/kit", "svelte"),
    ("react-dom", "react"),
    ("nextjs", "next"),
    ("next.js", "next"),
    ("@angular/core", "angular"),
    ("vue2", "vue"),
    ("vue3", "vue"),
    ("tailwind", "tailwindcss"),
    ("express.js", "express"),
];

/// Canonical framework name -> the package whose installed version governs it
pub(super) const FRAMEWORK_PACKAGES: &[(&str, &str)] = &[("angular", "@angular/core")];
