use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::Theme;

const STYLES: &str = r"
body.theme-espresso { --bg: #1c1410; --surface: #2a1f19; --border: #3d2e25; --text: #f5efe9; --muted: #b9a697; --primary: #c8773a; }
body.theme-latte { --bg: #f8f3ee; --surface: #ffffff; --border: #e4d7cb; --text: #2b1d14; --muted: #7a6556; --primary: #a05a2c; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); }
header { display: flex; align-items: center; justify-content: space-between; padding: 1rem; position: sticky; top: 0; background: var(--bg); }
a { color: inherit; }
.search { display: flex; gap: .5rem; padding: 0 1rem; }
.search input { flex: 1; padding: .75rem; border-radius: .75rem; border: 1px solid var(--border); background: var(--surface); color: var(--text); }
.chips { display: flex; flex-wrap: wrap; gap: .5rem; padding: .75rem 1rem; }
.chip { padding: .4rem 1rem; border-radius: 999px; border: 1px solid var(--border); background: var(--surface); text-decoration: none; font-size: .875rem; }
.chip.active { background: var(--primary); border-color: var(--primary); color: #fff; font-weight: bold; }
.facet-label { color: var(--muted); font-size: .75rem; width: 100%; }
.notice { margin: .5rem 1rem; padding: .75rem; border-radius: .5rem; border: 1px solid var(--primary); }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(11rem, 1fr)); gap: 1rem; padding: 1rem; }
.card { display: flex; flex-direction: column; gap: .5rem; padding: .75rem; border-radius: .75rem; background: var(--surface); border: 1px solid var(--border); }
.card-image { position: relative; aspect-ratio: 1; border-radius: .5rem; background: linear-gradient(135deg, #f5f5f5 0%, #e0e0e0 100%) center / cover no-repeat; display: flex; align-items: center; justify-content: center; font-size: 3rem; }
.badge { position: absolute; top: .5rem; right: .5rem; width: 2rem; height: 2rem; border-radius: 50%; display: flex; align-items: center; justify-content: center; color: #fff; font-weight: bold; font-size: .875rem; }
.badge-high { background: #22c55e; } .badge-mid { background: #eab308; } .badge-low { background: #f97316; }
.roaster, .meta { color: var(--muted); font-size: .875rem; margin: 0; }
.name { font-weight: bold; margin: 0; }
.price { font-size: 1.5rem; font-weight: bold; margin: auto 0 0; }
.actions { display: flex; flex-wrap: wrap; gap: .5rem; font-size: .8rem; }
.card.wishlisted { border-color: var(--primary); }
.buy { display: block; text-align: center; padding: .7rem; border-radius: .5rem; background: var(--primary); color: #fff; font-weight: bold; text-decoration: none; }
.empty { text-align: center; padding: 5rem 1rem; color: var(--muted); }
table.compare { margin: 1rem; border-collapse: collapse; }
table.compare th, table.compare td { padding: .4rem .8rem; border: 1px solid var(--border); text-align: left; }
";

/// Share links use the native share sheet, falling back to copying the link.
const SHARE_SCRIPT: &str = r"
document.addEventListener('click', async (event) => {
  const link = event.target.closest('a.share');
  if (!link) return;
  event.preventDefault();
  const payload = { title: link.dataset.title, text: link.dataset.text, url: link.href };
  if (navigator.share) {
    try { await navigator.share(payload); } catch (_) {}
    return;
  }
  try {
    await navigator.clipboard.writeText(payload.url);
    link.textContent = 'Link copied';
  } catch (_) {
    window.open(payload.url, '_blank', 'noopener');
  }
});
";

pub fn page(title: &str, theme: Theme, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content="Discover the best coffee deals with AI-powered price comparison.";
                title { (title) }
                style { (PreEscaped(STYLES)) }
            }
            body class={ "theme-" (theme.as_str()) } {
                (content)
                script { (PreEscaped(SHARE_SCRIPT)) }
            }
        }
    }
}
