use crate::utils::escape_html;
use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "Averemo";
const DEFAULT_TAGLINE: &str = "- shared truth -";
const DEFAULT_COPYRIGHT: &str = "(C) 2025 Averemo - All Rights Reserved";

const TOP_MENU: [(&str, &str); 3] = [
    ("/index.html", "Home"),
    ("/topics/", "Topics"),
    ("/about.html", "About&nbsp;Us"),
];
const BOTTOM_MENU: [(&str, &str); 2] = [("/index.html", "Home"), ("/about.html", "About Us")];

/// Page chrome settings. The base path is prefixed to every site-relative
/// URL, e.g. `/~phil/averemo` when the site is served from a user directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_path: String,
    pub title: String,
    pub tagline: String,
    pub copyright: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            title: DEFAULT_TITLE.to_string(),
            tagline: DEFAULT_TAGLINE.to_string(),
            copyright: DEFAULT_COPYRIGHT.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: normalize_base_path(base_path),
            ..Self::default()
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_path)
    }

    pub fn link(&self, url: &str, text: &str) -> String {
        format!("<li><a href=\"{}\">{text}</a></li>", self.url(url))
    }

    pub fn top_menu(&self) -> String {
        self.menu(&TOP_MENU)
    }

    pub fn bottom_menu(&self) -> String {
        self.menu(&BOTTOM_MENU)
    }

    fn menu(&self, entries: &[(&str, &str)]) -> String {
        let mut html = String::from("<ul>");
        for (url, text) in entries {
            html.push_str(&self.link(url, text));
        }
        html.push_str("</ul>");
        html
    }

    /// Opens the page container and the content div; pair with [`footer`].
    ///
    /// [`footer`]: SiteConfig::footer
    pub fn header(&self) -> String {
        format!(
            r#"
<div id="container">
<div id="header">
  <div id="leftheader">
      <a href="{home}"> <img src="{logo}" style="width:30vw"></a>
  </div>
  <div id="rightheader">
    <h1>{title}</h1>
    <h2>{tagline}</h2>
  </div>
  <br class="clearfloat"/>
</div>
<div id="topnav">
  {menu}
</div>

<div id="content">
"#,
            home = self.url("/"),
            logo = self.url("/images/flag_cropped.png"),
            title = escape_html(&self.title),
            tagline = escape_html(&self.tagline),
            menu = self.top_menu(),
        )
    }

    pub fn footer(&self) -> String {
        format!(
            r#"
</div>

<div id="footer">
  {menu}
  <p class="copyright">{copyright}</p>
</div>
</div>
"#,
            menu = self.bottom_menu(),
            copyright = escape_html(&self.copyright),
        )
    }

    /// Wraps already-rendered body HTML into a complete document.
    pub fn page(&self, title: &str, body_html: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<link rel=\"stylesheet\" href=\"{css}\">\n</head>\n<body>{header}{body_html}{footer}</body>\n</html>\n",
            title = escape_html(title),
            css = self.url("/style.css"),
            header = self.header(),
            footer = self.footer(),
        )
    }
}

fn normalize_base_path(base_path: &str) -> String {
    base_path.trim().trim_end_matches('/').to_string()
}
