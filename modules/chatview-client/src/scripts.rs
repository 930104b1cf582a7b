//! In-page scripts evaluated through the session service. Each script is a
//! self-contained expression returning a JSON-serializable value; the
//! optional request context is exposed to it as `context`.

/// Collect every currently rendered message bubble: the metadata header
/// attribute plus the joined visible text (falling back to the node's
/// innerText when the text spans are absent, e.g. forwarded media captions).
pub const COLLECT_SCRIPT: &str = r#"
(() => {
  const items = [];
  const nodes = document.querySelectorAll("div[data-pre-plain-text]");
  nodes.forEach((node) => {
    const header = node.getAttribute("data-pre-plain-text") || "";
    const textParts = [];
    const spans = node.querySelectorAll("span.selectable-text span");
    spans.forEach((s) => {
      const txt = (s.innerText || "").trim();
      if (txt) textParts.push(txt);
    });
    if (!textParts.length) {
      const fallback = (node.innerText || "").trim();
      if (fallback) textParts.push(fallback);
    }
    items.push({ header, text: textParts.join("\n").trim() });
  });
  return items;
})()
"#;

/// Click every visible "read more" control so long messages render in full.
/// Returns the number of controls clicked.
pub const EXPAND_SCRIPT: &str = r#"
(() => {
  const candidates = Array.from(document.querySelectorAll("button, div[role='button'], span"));
  let clicked = 0;

  for (const el of candidates) {
    const txt = (el.textContent || "").trim().toLowerCase();
    if (!txt) continue;

    const isReadMore =
      txt === "read more" ||
      txt.endsWith("read more") ||
      txt.includes("...read more");

    if (!isReadMore) continue;
    if (!(el instanceof HTMLElement)) continue;

    const style = window.getComputedStyle(el);
    if (style.display === "none" || style.visibility === "hidden") continue;

    el.click();
    clicked += 1;
  }
  return clicked;
})()
"#;

/// Locate the history pane (largest scrollable container holding message
/// bubbles) and scroll it up one step of max(300px, 90% of the viewport).
pub const SCROLL_SCRIPT: &str = r#"
(() => {
  const all = Array.from(document.querySelectorAll("div"));
  const candidates = all.filter((el) => {
    const style = window.getComputedStyle(el);
    const overflowY = style.overflowY;
    const canScroll = (overflowY === "auto" || overflowY === "scroll");
    const hasMessages = !!el.querySelector("div[data-pre-plain-text]");
    return canScroll && el.scrollHeight > el.clientHeight && hasMessages;
  });

  if (!candidates.length) {
    return { found: false };
  }

  const container = candidates.sort((a, b) => b.scrollHeight - a.scrollHeight)[0];
  const before = container.scrollTop;
  const step = Math.max(300, Math.floor(container.clientHeight * 0.9));
  container.scrollTop = Math.max(0, before - step);
  const after = container.scrollTop;

  return {
    found: true,
    before,
    after,
    at_top: after <= 0,
    scroll_height: container.scrollHeight,
    client_height: container.clientHeight,
  };
})()
"#;

/// Click the chat-list row whose title equals `context.name`.
pub const FIND_CHAT_SCRIPT: &str = r#"
(() => {
  const rows = Array.from(document.querySelectorAll("div[aria-label='Chat list'] span[title]"));
  const row = rows.find((el) => (el.getAttribute("title") || "").trim() === context.name);
  if (!row) {
    return { found: false };
  }
  row.click();
  return { found: true };
})()
"#;

/// True once the chat list has rendered, i.e. the hosted session is
/// authenticated and the app shell is up.
pub const READY_SCRIPT: &str = r#"
(() => !!document.querySelector("div[aria-label='Chat list']"))()
"#;
