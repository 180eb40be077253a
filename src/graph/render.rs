//! Interactive HTML rendering of the infrastructure graph
//!
//! Emits one self-contained document: embedded styles, embedded node/edge
//! data, and a small canvas force simulation. No CDN assets, so the file
//! keeps working on an offline homelab network.

use serde_json::{json, Value};

use super::{Graph, NodeTier};

fn node_radius(tier: NodeTier) -> u32 {
    match tier {
        NodeTier::Root => 34,
        NodeTier::Tier1 => 28,
        NodeTier::Tier2 => 22,
        NodeTier::Leaf => 16,
    }
}

/// Render the graph model into a standalone HTML page
pub fn generate_html(graph: &Graph, generated_at: &str) -> String {
    let nodes: Vec<Value> = graph
        .nodes
        .iter()
        .map(|n| {
            json!({
                "id": n.name,
                "label": n.label,
                "tooltip": n.tooltip,
                "color": n.tier.color(),
                "tier": n.tier.label(),
                "radius": node_radius(n.tier),
            })
        })
        .collect();

    let edges: Vec<Value> = graph
        .edges
        .iter()
        .map(|e| json!({"from": e.from, "to": e.to}))
        .collect();

    // serde_json handles all string escaping for the embedded data
    let nodes_json = Value::Array(nodes).to_string();
    let edges_json = Value::Array(edges).to_string();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>stackatlas – Infrastructure Graph</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: 'Segoe UI', Tahoma, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }}
        #header {{
            position: fixed;
            top: 0; left: 0; right: 0;
            height: 48px;
            background: #16213e;
            border-bottom: 1px solid #0f3460;
            display: flex;
            align-items: center;
            padding: 0 20px;
            gap: 20px;
            z-index: 1000;
        }}
        #header h1 {{ font-size: 17px; font-weight: 600; color: #e94560; }}
        .stat {{ font-size: 13px; color: #aaa; }}
        .stat b {{ color: #eee; margin-left: 4px; }}
        #canvas-container {{ position: fixed; top: 48px; left: 0; right: 0; bottom: 0; }}
        canvas {{ display: block; cursor: grab; }}
        #tooltip {{
            position: fixed;
            background: #16213e;
            border: 1px solid #0f3460;
            border-radius: 8px;
            padding: 10px 14px;
            font-size: 13px;
            pointer-events: none;
            opacity: 0;
            transition: opacity 0.15s;
            max-width: 420px;
            z-index: 2000;
        }}
        #tooltip.visible {{ opacity: 1; }}
        #tooltip h3 {{ color: #e94560; font-size: 14px; margin-bottom: 4px; }}
        #tooltip .tier {{ color: #888; font-size: 11px; text-transform: uppercase; }}
        #tooltip .ports {{ margin-top: 6px; color: #aaa; font-family: monospace; font-size: 12px; }}
        #legend {{
            position: fixed;
            bottom: 20px; left: 20px;
            background: #16213e;
            border: 1px solid #0f3460;
            border-radius: 8px;
            padding: 10px 14px;
            font-size: 12px;
            z-index: 1000;
        }}
        .legend-item {{ display: flex; align-items: center; gap: 8px; margin: 3px 0; }}
        .legend-dot {{ width: 12px; height: 12px; border-radius: 50%; }}
    </style>
</head>
<body>
    <div id="header">
        <h1>stackatlas</h1>
        <span class="stat">Nodes:<b>{node_count}</b></span>
        <span class="stat">Edges:<b>{edge_count}</b></span>
        <span class="stat">Generated:<b>{generated_at}</b></span>
    </div>

    <div id="canvas-container"><canvas id="graph"></canvas></div>
    <div id="tooltip"></div>

    <div id="legend">
        <div class="legend-item"><div class="legend-dot" style="background:{root_color}"></div><span>Node</span></div>
        <div class="legend-item"><div class="legend-dot" style="background:{tier1_color}"></div><span>VM</span></div>
        <div class="legend-item"><div class="legend-dot" style="background:{tier2_color}"></div><span>Stack</span></div>
        <div class="legend-item"><div class="legend-dot" style="background:{leaf_color}"></div><span>Container</span></div>
    </div>

    <script>
    (function() {{
        const nodes = {nodes_json};
        const edges = {edges_json};

        const canvas = document.getElementById('graph');
        const ctx = canvas.getContext('2d');
        const tooltip = document.getElementById('tooltip');

        let width, height;
        let scale = 1;
        let offsetX = 0, offsetY = 0;
        let panning = false;
        let dragNode = null;
        let lastMouse = {{ x: 0, y: 0 }};

        const nodeMap = {{}};
        nodes.forEach((n, i) => {{
            const angle = (i / nodes.length) * Math.PI * 2;
            const radius = Math.min(320, 40 + nodes.length * 12);
            nodeMap[n.id] = {{
                ...n,
                x: Math.cos(angle) * radius,
                y: Math.sin(angle) * radius,
                vx: 0, vy: 0
            }};
        }});

        function resize() {{
            const container = document.getElementById('canvas-container');
            width = canvas.width = container.clientWidth;
            height = canvas.height = container.clientHeight;
            offsetX = width / 2;
            offsetY = height / 2;
        }}

        function toScreen(x, y) {{ return {{ x: x * scale + offsetX, y: y * scale + offsetY }}; }}
        function toWorld(x, y) {{ return {{ x: (x - offsetX) / scale, y: (y - offsetY) / scale }}; }}

        function getNodeAt(mx, my) {{
            const w = toWorld(mx, my);
            for (const id in nodeMap) {{
                const n = nodeMap[id];
                const dx = w.x - n.x, dy = w.y - n.y;
                if (dx * dx + dy * dy < n.radius * n.radius) return n;
            }}
            return null;
        }}

        function simulate() {{
            const all = Object.values(nodeMap);

            for (let i = 0; i < all.length; i++) {{
                for (let j = i + 1; j < all.length; j++) {{
                    const a = all[i], b = all[j];
                    let dx = b.x - a.x, dy = b.y - a.y;
                    let dist = Math.sqrt(dx * dx + dy * dy) || 1;
                    if (dist > 500) continue;
                    const force = 4000 / (dist * dist);
                    const fx = (dx / dist) * force, fy = (dy / dist) * force;
                    a.vx -= fx; a.vy -= fy;
                    b.vx += fx; b.vy += fy;
                }}
            }}

            edges.forEach(e => {{
                const a = nodeMap[e.from], b = nodeMap[e.to];
                if (!a || !b) return;
                let dx = b.x - a.x, dy = b.y - a.y;
                let dist = Math.sqrt(dx * dx + dy * dy) || 1;
                const force = (dist - 120) * 0.04;
                const fx = (dx / dist) * force, fy = (dy / dist) * force;
                a.vx += fx; a.vy += fy;
                b.vx -= fx; b.vy -= fy;
            }});

            all.forEach(n => {{
                n.vx -= n.x * 0.001;
                n.vy -= n.y * 0.001;
                if (n === dragNode) return;
                n.vx *= 0.88; n.vy *= 0.88;
                n.x += n.vx; n.y += n.vy;
            }});
        }}

        function draw() {{
            ctx.clearRect(0, 0, width, height);

            ctx.strokeStyle = 'rgba(150, 150, 170, 0.5)';
            ctx.lineWidth = 1.5 * scale;
            edges.forEach(e => {{
                const a = nodeMap[e.from], b = nodeMap[e.to];
                if (!a || !b) return;
                const p1 = toScreen(a.x, a.y), p2 = toScreen(b.x, b.y);
                ctx.beginPath();
                ctx.moveTo(p1.x, p1.y);
                ctx.lineTo(p2.x, p2.y);
                ctx.stroke();

                const angle = Math.atan2(p2.y - p1.y, p2.x - p1.x);
                const dist = Math.hypot(p2.x - p1.x, p2.y - p1.y);
                const ratio = Math.max(0, (dist - b.radius * scale) / dist);
                const ax = p1.x + (p2.x - p1.x) * ratio;
                const ay = p1.y + (p2.y - p1.y) * ratio;
                const len = 7 * scale;
                ctx.beginPath();
                ctx.moveTo(ax, ay);
                ctx.lineTo(ax - len * Math.cos(angle - 0.4), ay - len * Math.sin(angle - 0.4));
                ctx.moveTo(ax, ay);
                ctx.lineTo(ax - len * Math.cos(angle + 0.4), ay - len * Math.sin(angle + 0.4));
                ctx.stroke();
            }});

            Object.values(nodeMap).forEach(n => {{
                const p = toScreen(n.x, n.y);
                const r = n.radius * scale;
                ctx.fillStyle = n.color;
                ctx.beginPath();
                ctx.arc(p.x, p.y, r, 0, Math.PI * 2);
                ctx.fill();
                ctx.strokeStyle = 'rgba(255,255,255,0.25)';
                ctx.lineWidth = 1.5 * scale;
                ctx.stroke();

                ctx.fillStyle = '#eee';
                ctx.font = `${{Math.max(10, 12 * scale)}}px 'Segoe UI', sans-serif`;
                ctx.textAlign = 'center';
                ctx.textBaseline = 'top';
                ctx.fillText(n.label, p.x, p.y + r + 4 * scale);
            }});
        }}

        function showTooltip(node, x, y) {{
            let html = `<h3>${{node.label}}</h3><span class="tier">${{node.tier}}</span>`;
            if (node.tooltip) html += `<div class="ports">${{node.tooltip}}</div>`;
            tooltip.innerHTML = html;
            tooltip.style.left = Math.min(x + 14, width - 440) + 'px';
            tooltip.style.top = (y + 14) + 'px';
            tooltip.classList.add('visible');
        }}

        function hideTooltip() {{ tooltip.classList.remove('visible'); }}

        canvas.addEventListener('mousedown', e => {{
            const rect = canvas.getBoundingClientRect();
            const node = getNodeAt(e.clientX - rect.left, e.clientY - rect.top);
            if (node) dragNode = node; else panning = true;
            lastMouse = {{ x: e.clientX, y: e.clientY }};
        }});

        canvas.addEventListener('mousemove', e => {{
            const rect = canvas.getBoundingClientRect();
            const mx = e.clientX - rect.left, my = e.clientY - rect.top;
            if (dragNode) {{
                const w = toWorld(mx, my);
                dragNode.x = w.x; dragNode.y = w.y;
                dragNode.vx = 0; dragNode.vy = 0;
            }} else if (panning) {{
                offsetX += e.clientX - lastMouse.x;
                offsetY += e.clientY - lastMouse.y;
            }} else {{
                const node = getNodeAt(mx, my);
                if (node) {{
                    showTooltip(node, e.clientX, e.clientY);
                    canvas.style.cursor = 'pointer';
                }} else {{
                    hideTooltip();
                    canvas.style.cursor = 'grab';
                }}
            }}
            lastMouse = {{ x: e.clientX, y: e.clientY }};
        }});

        canvas.addEventListener('mouseup', () => {{ panning = false; dragNode = null; }});
        canvas.addEventListener('mouseleave', () => {{ panning = false; dragNode = null; hideTooltip(); }});

        canvas.addEventListener('wheel', e => {{
            e.preventDefault();
            const delta = e.deltaY > 0 ? 0.9 : 1.1;
            const rect = canvas.getBoundingClientRect();
            const mx = e.clientX - rect.left, my = e.clientY - rect.top;
            offsetX = mx - (mx - offsetX) * delta;
            offsetY = my - (my - offsetY) * delta;
            scale = Math.max(0.2, Math.min(4, scale * delta));
        }});

        function loop() {{ simulate(); draw(); requestAnimationFrame(loop); }}

        window.addEventListener('resize', resize);
        resize();
        loop();
    }})();
    </script>
</body>
</html>"##,
        node_count = graph.nodes.len(),
        edge_count = graph.edges.len(),
        generated_at = generated_at,
        root_color = NodeTier::Root.color(),
        tier1_color = NodeTier::Tier1.color(),
        tier2_color = NodeTier::Tier2.color(),
        leaf_color = NodeTier::Leaf.color(),
        nodes_json = nodes_json,
        edges_json = edges_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use serde_json::json;

    fn sample_graph() -> Graph {
        build(&json!([{
            "Name": "N100",
            "Attributes": [{
                "Name": "LXC_0",
                "Attributes": [{
                    "Name": "site",
                    "Attributes": [{
                        "Name": "web1",
                        "Attributes": [{"IP": "0.0.0.0", "PrivatePort": 80, "PublicPort": 8080, "Type": "tcp"}]
                    }]
                }]
            }]
        }]))
    }

    #[test]
    fn test_html_embeds_nodes_and_tooltips() {
        let html = generate_html(&sample_graph(), "01.02.26 12:00");
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("\"web1\""));
        assert!(html.contains("\"LXC_0\""));
        assert!(html.contains("PrivatePort: 80"));
        assert!(html.contains("Nodes:<b>4</b>"));
        assert!(html.contains("Edges:<b>3</b>"));
        assert!(html.contains("01.02.26 12:00"));
    }

    #[test]
    fn test_html_carries_tier_palette() {
        let html = generate_html(&sample_graph(), "now");
        assert!(html.contains(NodeTier::Root.color()));
        assert!(html.contains(NodeTier::Tier1.color()));
        assert!(html.contains(NodeTier::Tier2.color()));
        assert!(html.contains(NodeTier::Leaf.color()));
    }

    #[test]
    fn test_html_is_self_contained() {
        let html = generate_html(&sample_graph(), "now");
        assert!(!html.contains("cdn."));
        assert!(!html.contains("<script src"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn test_html_escapes_node_data() {
        let mut graph = sample_graph();
        graph.nodes[0].label = "a\"b".into();
        graph.nodes[0].name = "a\"b".into();
        let html = generate_html(&graph, "now");
        // serde_json escapes the quote inside the embedded data
        assert!(html.contains(r#"a\"b"#));
    }

    #[test]
    fn test_empty_graph_still_renders() {
        let html = generate_html(&Graph::default(), "now");
        assert!(html.contains("Nodes:<b>0</b>"));
        assert!(html.contains("const nodes = []"));
    }
}
