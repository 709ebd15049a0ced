// src/render/templates.rs
//! Handlebars page templates.
//!
//! Templates are compiled into the binary. Post bodies and comment markup
//! are inserted unescaped (`{{{...}}}`); everything else is escaped.

use super::views::{IndexView, Labels, PostDetailView};
use crate::error::AppError;
use crate::types::RenderedPage;
use handlebars::Handlebars;
use serde::Serialize;

const INDEX_TEMPLATE_NAME: &str = "index";
const POST_TEMPLATE_NAME: &str = "post";
const LOADING_TEMPLATE_NAME: &str = "loading";

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head><meta charset="utf-8"><title>Blog</title></head>
<body>
<header class="header"><a href="/"><img src="/Logo.svg" alt="logo"></a></header>
<main class="container">
{{#each posts}}
  <section class="post">
    <a href="{{href}}"><h2>{{title}}</h2></a>
    <p>{{subtitle}}</p>
    <footer>
      <time>{{published}}</time>
      <span>{{author}}</span>
    </footer>
  </section>
{{/each}}
{{#if next_page}}
  <button type="button" data-next-page="{{next_page}}">{{labels.load_more}}</button>
{{/if}}
</main>
</body>
</html>
"#;

const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head><meta charset="utf-8"><title>{{title}}</title></head>
<body>
<header class="header"><a href="/"><img src="/Logo.svg" alt="logo"></a></header>
{{#if banner_url}}<img class="banner" src="{{banner_url}}" alt="{{title}}">{{/if}}
<main class="container">
  <article class="post">
    <h1>{{title}}</h1>
    <ul class="info">
      <li><time>{{published}}</time></li>
      <li>{{author}}</li>
      <li>{{reading_time}}</li>
    </ul>
    {{#if edited}}<p class="edited">* {{edited}}</p>{{/if}}
{{#each sections}}
    <section>
      <h2>{{heading}}</h2>
      <div class="content">{{{body_html}}}</div>
    </section>
{{/each}}
  </article>
  <hr>
  <nav class="navigation">
    {{#if previous}}<div class="previous"><h3>{{previous.title}}</h3><a href="{{previous.href}}">{{labels.previous_post}}</a></div>{{/if}}
    {{#if next}}<div class="next"><h3>{{next.title}}</h3><a href="{{next.href}}">{{labels.next_post}}</a></div>{{/if}}
  </nav>
  <div id="comments">{{{comments_html}}}</div>
</main>
</body>
</html>
"#;

const LOADING_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body><h1>{{loading}}</h1></body>
</html>
"#;

/// Renders view models into complete HTML pages.
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        for (name, source) in [
            (INDEX_TEMPLATE_NAME, INDEX_TEMPLATE),
            (POST_TEMPLATE_NAME, POST_TEMPLATE),
            (LOADING_TEMPLATE_NAME, LOADING_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| AppError::TemplateRenderError {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self { handlebars })
    }

    pub fn render_index(&self, view: &IndexView) -> Result<RenderedPage, AppError> {
        self.render(INDEX_TEMPLATE_NAME, view)
    }

    pub fn render_post(&self, view: &PostDetailView) -> Result<RenderedPage, AppError> {
        self.render(POST_TEMPLATE_NAME, view)
    }

    /// The placeholder served while an unknown post renders.
    pub fn render_loading(&self, labels: &Labels) -> Result<RenderedPage, AppError> {
        self.render(LOADING_TEMPLATE_NAME, labels)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<RenderedPage, AppError> {
        let html = self.handlebars.render(name, data)?;
        log::debug!("Rendered '{}' template: {} bytes", name, html.len());
        Ok(RenderedPage::new(html))
    }
}
