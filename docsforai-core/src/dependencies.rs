//! External toolchain checks: is every binary an adapter's build pass launches on `PATH`?

use tracing::{debug, warn};

use crate::framework::Framework;

/// One external program an adapter needs for its build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub name: &'static str,
    pub binary: &'static str,
    pub install_hint: &'static str,
}

const NODE: Dependency = Dependency {
    name: "node",
    binary: "node",
    install_hint: "Install Node.js from https://nodejs.org/",
};
const NPM: Dependency = Dependency {
    name: "npm",
    binary: "npm",
    install_hint: "npm ships with Node.js: https://nodejs.org/",
};
const NPX: Dependency = Dependency {
    name: "npx",
    binary: "npx",
    install_hint: "npx ships with Node.js: https://nodejs.org/",
};
const BUNDLER: Dependency = Dependency {
    name: "bundler",
    binary: "bundle",
    install_hint: "Install Ruby from https://www.ruby-lang.org/ and run 'gem install bundler'",
};
const HUGO: Dependency = Dependency {
    name: "hugo",
    binary: "hugo",
    install_hint: "Install Hugo from https://gohugo.io/",
};
const DOXYGEN: Dependency = Dependency {
    name: "doxygen",
    binary: "doxygen",
    install_hint: "Install Doxygen from https://www.doxygen.nl/",
};
const JAVADOC: Dependency = Dependency {
    name: "javadoc",
    binary: "javadoc",
    install_hint: "Install a Java JDK, e.g. from https://adoptium.net/",
};
const CARGO: Dependency = Dependency {
    name: "cargo",
    binary: "cargo",
    install_hint: "Install Rust from https://www.rust-lang.org/tools/install",
};
const GO: Dependency = Dependency {
    name: "go",
    binary: "go",
    install_hint: "Install Go from https://go.dev/dl/",
};
const MKDOCS: Dependency = Dependency {
    name: "mkdocs",
    binary: "mkdocs",
    install_hint: "Install MkDocs with 'pip install mkdocs'",
};
const SPHINX: Dependency = Dependency {
    name: "sphinx",
    binary: "sphinx-build",
    install_hint: "Install Sphinx with 'pip install sphinx'",
};
const JSDOC: Dependency = Dependency {
    name: "jsdoc",
    binary: "jsdoc",
    install_hint: "Install JSDoc with 'npm install -g jsdoc'",
};
const AGLIO: Dependency = Dependency {
    name: "aglio",
    binary: "aglio",
    install_hint: "Install aglio with 'npm install -g aglio'",
};
const ASCIIDOCTOR: Dependency = Dependency {
    name: "asciidoctor",
    binary: "asciidoctor",
    install_hint: "Install Asciidoctor with 'gem install asciidoctor'",
};

/// Programs the framework's adapter may launch. Frameworks parsed natively need none.
pub fn required_dependencies(framework: Framework) -> &'static [Dependency] {
    match framework {
        Framework::Docusaurus => &[NODE, NPM],
        Framework::VuePress => &[NODE, NPM, NPX],
        Framework::Jekyll => &[BUNDLER],
        Framework::Hugo => &[HUGO],
        Framework::Doxygen => &[DOXYGEN],
        Framework::Javadoc => &[JAVADOC],
        Framework::Rustdoc => &[CARGO],
        Framework::GoDoc => &[GO],
        Framework::MkDocs => &[MKDOCS],
        Framework::Sphinx => &[SPHINX],
        Framework::JsDoc => &[NODE, JSDOC],
        Framework::ApiBlueprint => &[AGLIO],
        Framework::AsciiDoc => &[ASCIIDOCTOR],
        // Read the Docs delegates; the delegate is only known at parse time.
        Framework::ReadTheDocs
        | Framework::GitBook
        | Framework::Docsify
        | Framework::OpenApi
        | Framework::Jupyter
        | Framework::Markdown
        | Framework::RestructuredText
        | Framework::Common
        | Framework::Unknown => &[],
    }
}

/// Dependencies of `framework` whose binary `is_installed` rejects.
pub fn missing_with(
    framework: Framework,
    is_installed: impl Fn(&str) -> bool,
) -> Vec<Dependency> {
    required_dependencies(framework)
        .iter()
        .filter(|dep| {
            let found = is_installed(dep.binary);
            debug!(framework = %framework, binary = dep.binary, found, "Checked dependency");
            !found
        })
        .copied()
        .collect()
}

/// Dependencies of `framework` that are not on `PATH`.
pub fn missing_dependencies(framework: Framework) -> Vec<Dependency> {
    let missing = missing_with(framework, |binary| which::which(binary).is_ok());
    if !missing.is_empty() {
        warn!(
            framework = %framework,
            missing = ?missing.iter().map(|d| d.name).collect::<Vec<_>>(),
            "Missing external dependencies"
        );
    }
    missing
}

/// One install hint per missing dependency, without repeats.
pub fn installation_instructions(missing: &[Dependency]) -> Vec<String> {
    let mut hints: Vec<String> = Vec::new();
    for dep in missing {
        let hint = dep.install_hint.to_string();
        if !hints.contains(&hint) {
            hints.push(hint);
        }
    }
    hints
}
