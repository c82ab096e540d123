//! Template sources compiled into the binary
//!
//! Paths are relative to this file. Adding a template means adding the file
//! under `templates/` and an entry here.

use super::{EmbeddedTemplate, TemplateBody};

macro_rules! text {
    ($id:literal) => {
        EmbeddedTemplate {
            id: $id,
            body: TemplateBody::Text(include_str!(concat!("../../templates/", $id))),
        }
    };
}

macro_rules! binary {
    ($id:literal) => {
        EmbeddedTemplate {
            id: $id,
            body: TemplateBody::Binary(include_bytes!(concat!("../../templates/", $id))),
        }
    };
}

pub static TEMPLATES: &[EmbeddedTemplate] = &[
    text!("gulpfile.js"),
    text!("_package.json"),
    text!("babelrc"),
    text!("gitignore"),
    text!("gitattributes"),
    text!("bowerrc"),
    text!("editorconfig"),
    binary!("favicon.ico"),
    binary!("apple-touch-icon.png"),
    text!("robots.txt"),
    text!("main.scss"),
    text!("main.css"),
    text!("main.js"),
    text!("index.html"),
    text!("test/mocha.html"),
    text!("test/mocha-spec.js"),
    text!("test/jasmine.html"),
    text!("test/jasmine-spec.js"),
];
