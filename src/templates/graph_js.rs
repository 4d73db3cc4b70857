//! D3.js graph renderer.
//!
//! Generates the `<style>` and `<script>` blocks for the graph page. The
//! script holds no graph logic of its own: every toggle or click refetches
//! the frame from the API with the new interaction state and redraws it,
//! keeping node positions across fetches.

/// Configuration for the graph renderer.
pub struct GraphRendererConfig {
    /// CSS selector for the container element (e.g. "#graph-container").
    pub container_selector: String,
    /// Endpoint serving render frames.
    pub api_url: String,
    /// Adapter name passed as `format`.
    pub format: String,
    /// Zoom to fit once the first layout settles.
    pub auto_fit: bool,
    /// (kind, color) pairs for the legend.
    pub legend: Vec<(String, String)>,
}

/// Returns the `<style>` block with `.pg-` prefixed classes.
pub fn graph_css() -> String {
    r#"
        .pg-link { stroke-opacity: 0.45; }
        .pg-link.emphasis { stroke-opacity: 1; }

        .pg-node circle { cursor: pointer; stroke: var(--bg); stroke-width: 1.5px; }
        .pg-node.selected circle { stroke: var(--base02); stroke-width: 3px; }
        .pg-node text {
            font-size: 10px;
            fill: var(--fg);
            pointer-events: none;
            text-anchor: middle;
        }

        .pg-tooltip {
            position: absolute;
            background: var(--bg);
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 0.4rem 0.7rem;
            font-size: 0.85rem;
            pointer-events: none;
            z-index: 1001;
            box-shadow: 0 4px 16px rgba(0,0,0,0.15);
            max-width: 320px;
        }

        .pg-legend {
            position: absolute;
            bottom: 8px;
            left: 8px;
            background: var(--bg);
            border: 1px solid var(--border);
            border-radius: 4px;
            padding: 0.35rem 0.6rem;
            font-size: 0.72rem;
            display: flex;
            gap: 0.35rem 0.7rem;
            align-items: center;
        }
        .pg-legend-item { display: flex; align-items: center; gap: 0.25rem; white-space: nowrap; }
        .pg-legend-dot { width: 9px; height: 9px; border-radius: 50%; display: inline-block; }
    "#
    .to_string()
}

/// Returns the `<script src="d3">` tag + `<script>` IIFE for the renderer.
pub fn render_graph_js(config: &GraphRendererConfig) -> String {
    let container_sel = &config.container_selector;
    let api_url = &config.api_url;
    let format = &config.format;
    let auto_fit = config.auto_fit;
    let legend_json = serde_json::to_string(&config.legend).unwrap_or("[]".to_string());

    format!(
        r##"<script src="https://d3js.org/d3.v7.min.js"></script>
        <script>
        (async function() {{
            const _pgContainer = document.querySelector('{container_sel}');
            if (!_pgContainer) return;

            const apiUrl = '{api_url}';
            const format = '{format}';
            const autoFit = {auto_fit};
            const legend = {legend_json};

            const artistsBox = document.getElementById('toggle-artists');
            const genresBox = document.getElementById('toggle-genres');

            // Interaction state mirrored into every request
            const state = {{ artists: false, genres: false, select: null }};
            const positions = {{}};
            let fitted = false;

            function frameUrl() {{
                let url = apiUrl + '?format=' + format
                    + '&artists=' + state.artists
                    + '&genres=' + state.genres;
                if (state.select) url += '&select=' + encodeURIComponent(state.select);
                return url;
            }}

            // --- SVG setup ---
            _pgContainer.innerHTML = '';
            const rect = _pgContainer.getBoundingClientRect();
            const width = rect.width || 600;
            const height = rect.height || 400;
            const svg = d3.select(_pgContainer).append('svg')
                .attr('width', '100%').attr('height', '100%');
            const g = svg.append('g');
            const linkGroup = g.append('g').attr('class', 'pg-links');
            const nodeGroup = g.append('g').attr('class', 'pg-nodes');

            const zoom = d3.zoom().scaleExtent([0.1, 6])
                .on('zoom', e => g.attr('transform', e.transform));
            svg.call(zoom);

            svg.on('click', e => {{
                if (e.target !== svg.node()) return;
                if (state.select === null) return;
                state.select = null;
                refresh();
            }});

            // --- Tooltip ---
            const tooltip = d3.select(_pgContainer).append('div')
                .attr('class', 'pg-tooltip')
                .style('display', 'none');

            // --- Legend ---
            const legendEl = d3.select(_pgContainer).append('div').attr('class', 'pg-legend');
            legend.forEach(([kind, color]) => {{
                const item = legendEl.append('span').attr('class', 'pg-legend-item');
                item.append('span').attr('class', 'pg-legend-dot').style('background', color);
                item.append('span').text(kind);
            }});

            const sim = d3.forceSimulation()
                .force('link', d3.forceLink().id(d => d.id).distance(60))
                .force('charge', d3.forceManyBody().strength(-120))
                .force('center', d3.forceCenter(width / 2, height / 2))
                .force('collide', d3.forceCollide().radius(d => d.size + 2))
                .on('tick', ticked)
                .on('end', () => {{
                    if (autoFit && !fitted) {{ fitted = true; zoomToFit(); }}
                }});

            let linkSel = linkGroup.selectAll('line');
            let nodeSel = nodeGroup.selectAll('g');

            function ticked() {{
                linkSel
                    .attr('x1', d => d.source.x).attr('y1', d => d.source.y)
                    .attr('x2', d => d.target.x).attr('y2', d => d.target.y);
                nodeSel.attr('transform', d => {{
                    positions[d.id] = {{ x: d.x, y: d.y }};
                    return 'translate(' + d.x + ',' + d.y + ')';
                }});
            }}

            function zoomToFit() {{
                const bounds = g.node().getBBox();
                if (!bounds.width || !bounds.height) return;
                const scale = Math.min(4, 0.9 / Math.max(bounds.width / width, bounds.height / height));
                const tx = width / 2 - scale * (bounds.x + bounds.width / 2);
                const ty = height / 2 - scale * (bounds.y + bounds.height / 2);
                svg.transition().duration(400)
                    .call(zoom.transform, d3.zoomIdentity.translate(tx, ty).scale(scale));
            }}

            function draw(data) {{
                // Nodes keep their last position across frames
                const nodes = data.nodes.map(n => Object.assign({{}}, n, positions[n.id] || {{}}));
                const links = data.links.map(l => Object.assign({{}}, l));

                linkSel = linkGroup.selectAll('line')
                    .data(links, d => d.id)
                    .join('line')
                    .attr('class', d => 'pg-link' + (d.emphasis ? ' emphasis' : ''))
                    .attr('stroke', d => d.color)
                    .attr('stroke-width', d => d.size);

                nodeSel = nodeGroup.selectAll('g.pg-node')
                    .data(nodes, d => d.id)
                    .join(enter => {{
                        const ng = enter.append('g').attr('class', 'pg-node');
                        ng.append('circle');
                        ng.append('text');
                        ng.call(d3.drag()
                            .on('start', (e, d) => {{
                                if (!e.active) sim.alphaTarget(0.3).restart();
                                d.fx = d.x; d.fy = d.y;
                            }})
                            .on('drag', (e, d) => {{ d.fx = e.x; d.fy = e.y; }})
                            .on('end', (e, d) => {{
                                if (!e.active) sim.alphaTarget(0);
                                d.fx = null; d.fy = null;
                            }}));
                        return ng;
                    }})
                    .classed('selected', d => d.id === data.selected)
                    // frame order is draw order
                    .order();

                nodeSel.select('circle')
                    .attr('r', d => d.size)
                    .attr('fill', d => d.color);
                nodeSel.select('text')
                    .text(d => d.showLabel ? (d.label.length > 24 ? d.label.substring(0, 24) + '…' : d.label) : '')
                    .attr('dy', d => -(d.size + 3));

                nodeSel
                    .on('click', (e, d) => {{
                        e.stopPropagation();
                        state.select = state.select === d.id ? null : d.id;
                        refresh();
                    }})
                    .on('mouseover', (e, d) => {{
                        tooltip.style('display', 'block').text(d.title);
                    }})
                    .on('mousemove', e => {{
                        const box = _pgContainer.getBoundingClientRect();
                        tooltip
                            .style('left', (e.clientX - box.left + 12) + 'px')
                            .style('top', (e.clientY - box.top + 12) + 'px');
                    }})
                    .on('mouseout', () => tooltip.style('display', 'none'));

                sim.nodes(nodes);
                sim.force('link').links(links);
                sim.alpha(fitted ? 0.3 : 1).restart();
            }}

            async function refresh() {{
                const resp = await fetch(frameUrl());
                if (!resp.ok) {{
                    _pgContainer.insertAdjacentHTML('afterbegin',
                        '<div style="padding:1rem;color:var(--red);">Failed to load graph</div>');
                    return;
                }}
                const data = await resp.json();
                // The server applies the layer cascade; reflect it back
                state.artists = data.layers.artists;
                state.genres = data.layers.genres;
                state.select = data.selected;
                if (artistsBox) artistsBox.checked = state.artists;
                if (genresBox) genresBox.checked = state.genres;
                draw(data);
            }}

            if (artistsBox) artistsBox.addEventListener('change', () => {{
                state.artists = artistsBox.checked;
                if (!state.artists) state.genres = false;
                refresh();
            }});
            if (genresBox) genresBox.addEventListener('change', () => {{
                state.genres = genresBox.checked;
                refresh();
            }});

            await refresh();
        }})();
        </script>"##
    )
}
