use linesight_types::config::CameraConfig;

/// Operator viewer: the live stream plus click-to-mark and flush wiring.
/// Clicks report coordinates relative to the rendered canvas, which the
/// relay projects to ground space.
const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Linesight Relay</title>
<style>
body { font-family: sans-serif; margin: 2em; }
#feed { border: 1px solid #444; cursor: crosshair; display: block; }
#flush { margin-top: 1em; }
</style>
</head>
<body>
<h1>Live Drone Feed</h1>
<img id="feed" src="/video_feed" width="__WIDTH__" height="__HEIGHT__">
<p id="status">Click the stream to mark an outage point.</p>
<button id="flush">Send outage points</button>
<ul id="points"></ul>
<script>
const feed = document.getElementById('feed');
const status = document.getElementById('status');
const list = document.getElementById('points');

feed.addEventListener('click', async (e) => {
  const rect = feed.getBoundingClientRect();
  const body = JSON.stringify({ x: e.clientX - rect.left, y: e.clientY - rect.top });
  const res = await fetch('/add_point', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body,
  });
  const data = await res.json();
  if (data.status === 'success') {
    const item = document.createElement('li');
    item.textContent = '(' + data.point[0].toFixed(2) + ', ' + data.point[1].toFixed(2) + ')';
    list.appendChild(item);
    status.textContent = 'Marked ' + list.children.length + ' point(s).';
  } else {
    status.textContent = data.message;
  }
});

document.getElementById('flush').addEventListener('click', async () => {
  const res = await fetch('/send_outage', { method: 'POST' });
  const data = await res.json();
  status.textContent = 'Flushed ' + data.points.length + ' point(s) to the drone.';
  list.innerHTML = '';
});
</script>
</body>
</html>
"#;

pub(crate) fn render(camera: &CameraConfig) -> String {
    VIEWER_TEMPLATE
        .replace("__WIDTH__", &camera.canvas_width.to_string())
        .replace("__HEIGHT__", &camera.canvas_height.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_dimensions_are_substituted() {
        let page = render(&CameraConfig::default());
        assert!(page.contains(r#"width="640" height="480""#));
        assert!(!page.contains("__WIDTH__"));
    }
}
