//! HTML dashboard generation.

use super::DashboardData;

/// Generate the dashboard page
pub fn generate_html(data: &DashboardData) -> anyhow::Result<String> {
    // keep "</script>" inside string values from closing the script element
    let json_data = serde_json::to_string(data)?.replace("</", "<\\/");
    let js = JS.replace("__JSON_DATA__", &json_data);

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        <div class="filters">
            <div class="filter-group">
                <label for="dropdown-statistics">Select Statistics:</label>
                <select id="dropdown-statistics">
                    <option value="">Select a report type</option>
                </select>
            </div>
            <div class="filter-group">
                <label for="select-year">Year</label>
                <select id="select-year" disabled>
                    <option value="">Select-year</option>
                </select>
            </div>
        </div>
    </header>

    <main>
        <div id="output-container" class="chart-grid"></div>
    </main>

    <footer id="dataset-summary"></footer>

    <script>
{js}
    </script>
</body>
</html>"##,
        title = data.title,
        css = CSS,
        js = js
    ))
}

const CSS: &str = r#"
:root {
    --heading: #503D36;
    --gray-50: #f9fafb;
    --gray-200: #e5e7eb;
    --gray-300: #d1d5db;
    --gray-500: #6b7280;
    --gray-700: #374151;
    --gray-900: #111827;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    background: var(--gray-50);
    color: var(--gray-900);
    line-height: 1.5;
}

header {
    background: white;
    border-bottom: 1px solid var(--gray-200);
    padding: 1.5rem 2rem;
}

header h1 {
    text-align: center;
    color: var(--heading);
    font-size: 24px;
    margin-bottom: 1rem;
}

.filters {
    display: flex;
    flex-wrap: wrap;
    gap: 1.5rem;
    justify-content: center;
}

.filter-group {
    display: flex;
    flex-direction: column;
    gap: 0.375rem;
    min-width: 280px;
}

.filter-group label {
    font-size: 0.75rem;
    font-weight: 500;
    color: var(--gray-500);
    text-transform: uppercase;
    letter-spacing: 0.05em;
}

select {
    padding: 0.5rem 0.75rem;
    border: 1px solid var(--gray-300);
    border-radius: 0.375rem;
    font-size: 1rem;
    background: white;
    text-align-last: center;
}

select:disabled {
    background: var(--gray-200);
    color: var(--gray-500);
}

main {
    padding: 2rem;
    max-width: 1400px;
    margin: 0 auto;
}

.chart-grid {
    display: flex;
    flex-direction: column;
    gap: 1.5rem;
}

.chart-item {
    display: flex;
    gap: 1.5rem;
}

.chart-cell {
    flex: 1 1 0;
    background: white;
    border: 1px solid var(--gray-200);
    border-radius: 0.5rem;
    padding: 0.5rem;
    min-width: 0;
}

svg.chart {
    width: 100%;
    height: auto;
    display: block;
}

.chart-title {
    font-size: 14px;
    font-weight: 600;
    fill: var(--gray-900);
}

.axis {
    stroke: var(--gray-700);
}

.grid {
    stroke: var(--gray-200);
}

.tick,
.legend {
    font-size: 10px;
    fill: var(--gray-700);
}

.axis-label {
    font-size: 11px;
    fill: var(--gray-500);
}

.empty-notice {
    font-size: 12px;
    fill: var(--gray-500);
}

footer {
    text-align: center;
    font-size: 0.75rem;
    color: var(--gray-500);
    padding: 1rem;
}

@media (max-width: 900px) {
    .chart-item {
        flex-direction: column;
    }
}
"#;

const JS: &str = r###"
const DATA = __JSON_DATA__;

const SVG_NS = 'http://www.w3.org/2000/svg';
const WIDTH = 560;
const HEIGHT = 360;
const MARGIN = { top: 44, right: 24, bottom: 56, left: 72 };
const PLOT_W = WIDTH - MARGIN.left - MARGIN.right;
const PLOT_H = HEIGHT - MARGIN.top - MARGIN.bottom;
const PALETTE = ['#636efa', '#ef553b', '#00cc96', '#ab63fa', '#ffa15a', '#19d3f3', '#ff6692', '#b6e880', '#ff97ff', '#fecb52'];
const EMPTY_REPORT = { rows: [] };

function svgEl(name, attrs, text) {
    const node = document.createElementNS(SVG_NS, name);
    Object.entries(attrs || {}).forEach(([k, v]) => node.setAttribute(k, v));
    if (text !== undefined) node.textContent = text;
    return node;
}

function cellValue(table, row, field) {
    if (field === table.value) return row.value;
    const idx = table.keys.indexOf(field);
    return idx >= 0 ? row.key[idx] : null;
}

function labelFor(chart, field) {
    return (chart.labels && chart.labels[field]) || field;
}

function formatKey(value) {
    return value === null || value === undefined ? '(missing)' : String(value);
}

function formatNumber(value) {
    if (value === null || value === undefined) return '-';
    return Number(value).toLocaleString('en-US', { maximumFractionDigits: 2 });
}

function niceMax(value) {
    if (!(value > 0)) return 1;
    const magnitude = Math.pow(10, Math.floor(Math.log10(value)));
    return Math.ceil(value / magnitude) * magnitude;
}

function distinct(values) {
    const seen = new Map();
    values.forEach(v => {
        const k = formatKey(v);
        if (!seen.has(k)) seen.set(k, v);
    });
    return Array.from(seen.keys());
}

function newChart(chart) {
    const svg = svgEl('svg', { viewBox: `0 0 ${WIDTH} ${HEIGHT}`, class: 'chart' });
    svg.appendChild(svgEl('text', { x: WIDTH / 2, y: 24, 'text-anchor': 'middle', class: 'chart-title' }, chart.title));
    return svg;
}

function emptyNotice(svg) {
    svg.appendChild(svgEl('text', { x: WIDTH / 2, y: HEIGHT / 2, 'text-anchor': 'middle', class: 'empty-notice' }, 'No data'));
    return svg;
}

function isMissing(value) {
    return value === null || value === undefined;
}

function yPos(value, maxY) {
    return MARGIN.top + PLOT_H - PLOT_H * (value / maxY);
}

// Consecutive runs of indices with a value; a missing value ends a run.
function segments(values) {
    const runs = [];
    let current = [];
    values.forEach((v, i) => {
        if (isMissing(v)) {
            if (current.length) runs.push(current);
            current = [];
        } else {
            current.push(i);
        }
    });
    if (current.length) runs.push(current);
    return runs;
}

function drawAxes(svg, chart, maxY) {
    const bottom = MARGIN.top + PLOT_H;
    for (let i = 0; i <= 4; i++) {
        const y = bottom - (PLOT_H * i) / 4;
        svg.appendChild(svgEl('line', { x1: MARGIN.left, y1: y, x2: MARGIN.left + PLOT_W, y2: y, class: 'grid' }));
        svg.appendChild(svgEl('text', { x: MARGIN.left - 6, y: y + 3, 'text-anchor': 'end', class: 'tick' }, formatNumber((maxY * i) / 4)));
    }
    svg.appendChild(svgEl('line', { x1: MARGIN.left, y1: bottom, x2: MARGIN.left + PLOT_W, y2: bottom, class: 'axis' }));
    svg.appendChild(svgEl('line', { x1: MARGIN.left, y1: MARGIN.top, x2: MARGIN.left, y2: bottom, class: 'axis' }));

    const { x, y } = chart.encoding;
    svg.appendChild(svgEl('text', { x: MARGIN.left + PLOT_W / 2, y: HEIGHT - 8, 'text-anchor': 'middle', class: 'axis-label' }, labelFor(chart, x)));
    const midY = MARGIN.top + PLOT_H / 2;
    svg.appendChild(svgEl('text', { x: 14, y: midY, 'text-anchor': 'middle', transform: `rotate(-90 14 ${midY})`, class: 'axis-label' }, labelFor(chart, y)));
}

function drawXTicks(svg, labels, xFor) {
    const every = Math.max(1, Math.ceil(labels.length / 12));
    labels.forEach((label, i) => {
        if (i % every !== 0) return;
        svg.appendChild(svgEl('text', { x: xFor(i), y: MARGIN.top + PLOT_H + 16, 'text-anchor': 'middle', class: 'tick' }, label));
    });
}

function drawLegend(svg, names) {
    names.forEach((name, i) => {
        const y = MARGIN.top + i * 14;
        svg.appendChild(svgEl('rect', { x: WIDTH - MARGIN.right - 110, y: y - 8, width: 10, height: 10, fill: PALETTE[i % PALETTE.length] }));
        svg.appendChild(svgEl('text', { x: WIDTH - MARGIN.right - 96, y: y + 1, class: 'legend' }, name));
    });
}

function drawLine(chart) {
    const svg = newChart(chart);
    const { table } = chart;
    const { x, y } = chart.encoding;
    if (table.rows.length === 0) return emptyNotice(svg);

    const values = table.rows.map(r => cellValue(table, r, y));
    const maxY = niceMax(Math.max(0, ...values.map(v => v || 0)));
    drawAxes(svg, chart, maxY);

    const step = table.rows.length > 1 ? PLOT_W / (table.rows.length - 1) : 0;
    const xFor = i => (table.rows.length > 1 ? MARGIN.left + i * step : MARGIN.left + PLOT_W / 2);
    segments(values).forEach(run => {
        const points = run.map(i => `${xFor(i)},${yPos(values[i], maxY)}`).join(' ');
        svg.appendChild(svgEl('polyline', { points, fill: 'none', stroke: PALETTE[0], 'stroke-width': 2 }));
    });

    table.rows.forEach((r, i) => {
        if (isMissing(values[i])) return;
        const dot = svgEl('circle', { cx: xFor(i), cy: yPos(values[i], maxY), r: 3, fill: PALETTE[0] });
        dot.appendChild(svgEl('title', {}, `${formatKey(cellValue(table, r, x))}: ${formatNumber(values[i])}`));
        svg.appendChild(dot);
    });
    drawXTicks(svg, table.rows.map(r => formatKey(cellValue(table, r, x))), xFor);
    return svg;
}

function drawBar(chart) {
    const svg = newChart(chart);
    const { table } = chart;
    const { x, y, color } = chart.encoding;
    if (table.rows.length === 0) return emptyNotice(svg);

    const categories = distinct(table.rows.map(r => cellValue(table, r, x)));
    const series = color ? distinct(table.rows.map(r => cellValue(table, r, color))) : [''];
    const maxY = niceMax(Math.max(0, ...table.rows.map(r => cellValue(table, r, y) || 0)));
    drawAxes(svg, chart, maxY);

    const band = PLOT_W / categories.length;
    const barWidth = (band * 0.8) / series.length;
    const xFor = i => MARGIN.left + band * i + band / 2;

    table.rows.forEach(r => {
        const value = cellValue(table, r, y);
        if (isMissing(value)) return;
        const ci = categories.indexOf(formatKey(cellValue(table, r, x)));
        const si = color ? series.indexOf(formatKey(cellValue(table, r, color))) : 0;
        const top = yPos(value, maxY);
        const bar = svgEl('rect', {
            x: MARGIN.left + band * ci + band * 0.1 + barWidth * si,
            y: top,
            width: Math.max(barWidth - 1, 1),
            height: MARGIN.top + PLOT_H - top,
            fill: PALETTE[si % PALETTE.length]
        });
        const seriesName = color ? ` (${series[si]})` : '';
        bar.appendChild(svgEl('title', {}, `${categories[ci]}${seriesName}: ${formatNumber(value)}`));
        svg.appendChild(bar);
    });

    drawXTicks(svg, categories, xFor);
    if (color) drawLegend(svg, series);
    return svg;
}

function drawPie(chart) {
    const svg = newChart(chart);
    const { table } = chart;
    const { names, values } = chart.encoding;
    const slices = table.rows
        .map(r => ({ name: formatKey(cellValue(table, r, names)), value: cellValue(table, r, values) || 0 }))
        .filter(s => s.value > 0);
    const total = slices.reduce((sum, s) => sum + s.value, 0);
    if (total <= 0) return emptyNotice(svg);

    const cx = MARGIN.left + PLOT_H / 2;
    const cy = MARGIN.top + PLOT_H / 2;
    const radius = PLOT_H / 2;
    let angle = -Math.PI / 2;

    slices.forEach((s, i) => {
        const fill = PALETTE[i % PALETTE.length];
        const share = s.value / total;
        let shape;
        if (slices.length === 1) {
            shape = svgEl('circle', { cx, cy, r: radius, fill });
        } else {
            const end = angle + share * 2 * Math.PI;
            const large = share > 0.5 ? 1 : 0;
            const x1 = cx + radius * Math.cos(angle);
            const y1 = cy + radius * Math.sin(angle);
            const x2 = cx + radius * Math.cos(end);
            const y2 = cy + radius * Math.sin(end);
            shape = svgEl('path', { d: `M ${cx} ${cy} L ${x1} ${y1} A ${radius} ${radius} 0 ${large} 1 ${x2} ${y2} Z`, fill });
            angle = end;
        }
        shape.appendChild(svgEl('title', {}, `${s.name}: ${formatNumber(s.value)} (${(share * 100).toFixed(1)}%)`));
        svg.appendChild(shape);
    });

    drawLegend(svg, slices.map(s => `${s.name} ${((s.value / total) * 100).toFixed(1)}%`));
    return svg;
}

const RENDERERS = { line: drawLine, bar: drawBar, pie: drawPie };

function renderReport(report) {
    const container = document.getElementById('output-container');
    container.innerHTML = '';
    report.rows.forEach(row => {
        const item = document.createElement('div');
        item.className = 'chart-item';
        row.forEach(chart => {
            const cell = document.createElement('div');
            cell.className = 'chart-cell';
            cell.appendChild(RENDERERS[chart.kind](chart));
            item.appendChild(cell);
        });
        container.appendChild(item);
    });
}

function selectedReport(reportType, year) {
    if (reportType === 'Recession Period Statistics') return DATA.recession;
    if (reportType === 'Yearly Statistics' && year !== '') return DATA.yearly[year] || EMPTY_REPORT;
    return EMPTY_REPORT;
}

function onReportTypeChange() {
    const reportType = document.getElementById('dropdown-statistics').value;
    const disabled = DATA.year_disabled[reportType];
    document.getElementById('select-year').disabled = disabled === undefined ? true : disabled;
    onSelectionChange();
}

function onSelectionChange() {
    const reportType = document.getElementById('dropdown-statistics').value;
    const year = document.getElementById('select-year').value;
    renderReport(selectedReport(reportType, year));
}

function populateSelectors() {
    const reportSelect = document.getElementById('dropdown-statistics');
    DATA.report_types.forEach(t => {
        const option = document.createElement('option');
        option.value = t.value;
        option.textContent = t.label;
        reportSelect.appendChild(option);
    });

    const yearSelect = document.getElementById('select-year');
    DATA.years.forEach(y => {
        const option = document.createElement('option');
        option.value = y;
        option.textContent = y;
        yearSelect.appendChild(option);
    });

    reportSelect.addEventListener('change', onReportTypeChange);
    yearSelect.addEventListener('change', onSelectionChange);
}

function renderSummary() {
    const s = DATA.summary;
    const span = s.first_year === null ? '' : `, ${s.first_year}-${s.last_year}`;
    document.getElementById('dataset-summary').textContent = `${s.records} sales records${span}`;
}

function init() {
    populateSelectors();
    renderSummary();
    onReportTypeChange();
}

init();
"###;
