pub const INDEX_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sujit Editor</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f1f5f9;
            color: #0f172a;
            padding: 32px 16px;
        }
        .shell { max-width: 1200px; margin: 0 auto; }
        header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 32px; flex-wrap: wrap; gap: 16px; }
        h1 { font-size: 2em; font-weight: 900; letter-spacing: -0.03em; }
        h1 span { color: #2563eb; }
        .tagline { font-size: 0.7em; font-weight: 700; color: #64748b; text-transform: uppercase; letter-spacing: 0.2em; }
        .modes { background: white; padding: 6px; border-radius: 24px; display: flex; gap: 4px; border: 1px solid #e2e8f0; }
        .modes button { padding: 12px 28px; border-radius: 18px; border: none; font-weight: 900; cursor: pointer; background: transparent; color: #64748b; }
        .modes button.active { background: #0f172a; color: white; }
        .grid { display: grid; grid-template-columns: 2fr 1fr; gap: 32px; }
        @media (max-width: 900px) { .grid { grid-template-columns: 1fr; } }
        .card { background: white; border-radius: 32px; border: 1px solid #e2e8f0; padding: 24px; box-shadow: 0 20px 40px rgba(15,23,42,0.08); }
        .stage { min-height: 520px; display: flex; flex-direction: column; gap: 24px; }
        .upload-area {
            flex: 1; border: 3px dashed #cbd5e1; border-radius: 24px; display: flex; align-items: center;
            justify-content: center; flex-direction: column; cursor: pointer; min-height: 360px; background: #f8fafc;
        }
        .upload-area img, .result img { max-width: 100%; max-height: 480px; border-radius: 16px; }
        .upload-hint { color: #94a3b8; font-size: 0.85em; margin-top: 8px; }
        input[type="file"] { display: none; }
        textarea {
            width: 100%; min-height: 120px; border: 2px solid #e2e8f0; border-radius: 24px; padding: 20px;
            font-size: 1.05em; font-weight: 700; resize: vertical;
        }
        .primary { background: #0f172a; color: white; border: none; padding: 16px 32px; border-radius: 18px; font-weight: 900; cursor: pointer; }
        .primary:disabled { opacity: 0.4; cursor: not-allowed; }
        .secondary { background: #f1f5f9; color: #334155; border: none; padding: 16px 32px; border-radius: 18px; font-weight: 900; cursor: pointer; }
        .row { display: flex; gap: 12px; flex-wrap: wrap; }
        .section-label { font-size: 0.65em; font-weight: 900; color: #94a3b8; text-transform: uppercase; letter-spacing: 0.15em; margin: 16px 0 8px; }
        .toggles { display: grid; grid-template-columns: 1fr 1fr; gap: 8px; }
        .toggle { padding: 14px; border-radius: 16px; border: 2px solid #f1f5f9; background: #f8fafc; font-weight: 900; font-size: 0.7em; cursor: pointer; color: #94a3b8; }
        .toggle.on { border-color: #2563eb; background: #eff6ff; color: #1e3a8a; }
        .steps li { list-style: none; display: flex; gap: 12px; align-items: center; padding: 8px 0; font-weight: 600; color: #64748b; }
        .steps .dot { width: 28px; height: 28px; border-radius: 50%; background: #e2e8f0; display: flex; align-items: center; justify-content: center; font-size: 0.8em; }
        .steps li.done { color: #0f172a; }
        .steps li.done .dot { background: #22c55e; color: white; }
        .bar { height: 6px; background: #e2e8f0; border-radius: 3px; margin-top: 16px; overflow: hidden; }
        .bar div { height: 100%; background: #2563eb; transition: width 0.4s; }
        .error { background: #fee; border: 2px solid #fcc; color: #c33; padding: 15px; border-radius: 10px; }
        .story { background: #eef2ff; border: 1px solid #e0e7ff; border-radius: 24px; padding: 24px; font-style: italic; position: relative; }
        .story button { position: absolute; top: 12px; right: 16px; border: none; background: none; cursor: pointer; color: #94a3b8; }
        .writing { background: #0f172a; color: white; border-radius: 28px; padding: 20px; margin-top: 24px; }
        .writing button { width: 100%; text-align: left; background: rgba(255,255,255,0.05); color: white; border: 1px solid rgba(255,255,255,0.08); padding: 14px; border-radius: 14px; font-weight: 900; font-size: 0.7em; cursor: pointer; margin-top: 8px; }
        .hidden { display: none !important; }
    </style>
</head>
<body>
<div class="shell">
    <header>
        <div>
            <h1>Sujit <span>Editor</span></h1>
            <p class="tagline">Ultimate neural engine</p>
        </div>
        <div class="modes">
            <button id="modeEdit" data-mode="edit">PRO EDITOR</button>
            <button id="modeGenerate" data-mode="generate">NEURAL CREATOR</button>
        </div>
    </header>

    <div class="grid">
        <div class="card stage">
            <div id="error" class="error hidden"></div>

            <div id="result" class="result hidden">
                <img id="resultImage" alt="Result">
                <div id="story" class="story hidden">
                    <button id="dismissStory" title="Dismiss">&times;</button>
                    <p id="storyText"></p>
                </div>
                <div class="row" style="margin-top: 16px">
                    <button id="compare" class="secondary">HOLD TO COMPARE</button>
                    <a id="download" class="primary" href="/api/download">DOWNLOAD MASTERPIECE</a>
                    <button id="reset" class="secondary">NEW PROJECT</button>
                </div>
            </div>

            <div id="composer">
                <div id="uploadArea" class="upload-area">
                    <img id="preview" class="hidden" alt="Preview">
                    <div id="uploadPrompt">
                        <div>Click to upload a portrait</div>
                        <div class="upload-hint">JPG, PNG, WebP &middot; up to 10MB</div>
                    </div>
                    <input type="file" id="fileInput" accept="image/*">
                </div>
                <div id="creatorIntro" class="upload-area hidden">
                    <h2>Neural Creator</h2>
                    <p class="upload-hint">Describe your vision to generate a photograph from scratch.</p>
                </div>
                <div id="commandBox" style="margin-top: 24px">
                    <textarea id="prompt"></textarea>
                    <div class="row" style="justify-content: flex-end; margin-top: 12px">
                        <button id="run" class="primary">PROCESS MASTERPIECE</button>
                    </div>
                </div>
            </div>
        </div>

        <div>
            <div id="progressCard" class="card hidden">
                <h3>AI is retouching your photo</h3>
                <ul id="steps" class="steps"></ul>
                <div class="bar"><div id="barFill" style="width: 0%"></div></div>
            </div>

            <div id="configCard" class="card">
                <h3 id="configTitle">PRO CONFIG</h3>
                <div id="editConfig">
                    <p class="section-label">Epic style conversions</p>
                    <div class="toggles">
                        <button class="toggle" data-flag="cyberpunk">CYBERPUNK</button>
                        <button class="toggle" data-flag="royal">ROYAL</button>
                        <button class="toggle" data-flag="anime">ANIME</button>
                        <button class="toggle" data-flag="oilPainting">OIL PAINT</button>
                    </div>
                    <p class="section-label">Enhancements</p>
                    <div class="toggles">
                        <button class="toggle" data-flag="himalayanBackground">HIMALAYAN BG</button>
                        <button class="toggle" data-flag="removeBackground">STUDIO BG</button>
                        <button class="toggle" data-flag="smile">MAGIC SMILE</button>
                        <button class="toggle" data-flag="ethereal">ETHEREAL GLOW</button>
                        <button class="toggle" data-flag="maleMakeup">MALE MAKEUP</button>
                        <button class="toggle" data-flag="femaleMakeup">FEMALE MAKEUP</button>
                    </div>
                </div>
                <div id="generateConfig" class="hidden">
                    <p class="section-label">Output preset</p>
                    <button class="toggle on" disabled>MASTER PHOTOGRAPHY</button>
                </div>

                <div id="writing" class="writing hidden">
                    <h4>WRITING SYSTEM</h4>
                    <button data-kind="caption">GENERATE SOCIAL CAPTION</button>
                    <button data-kind="story">NEURAL SHORT STORY</button>
                    <p id="writingBusy" class="hidden" style="margin-top: 12px; font-size: 0.7em">PROCESSING SCRIPT...</p>
                </div>
            </div>
        </div>
    </div>
</div>

<script>
    const $ = (id) => document.getElementById(id);
    let state = null;
    let showOriginal = false;

    async function api(method, path, body) {
        const init = { method };
        if (body instanceof FormData) {
            init.body = body;
        } else if (body !== undefined) {
            init.headers = { 'Content-Type': 'application/json' };
            init.body = JSON.stringify(body);
        }
        const response = await fetch(path, init);
        const json = await response.json().catch(() => null);
        if (json && json.mode) {
            render(json);
        }
        return { ok: response.ok, json };
    }

    function imageUrl(slot) {
        return `/api/image/${slot}?v=${state.revision}`;
    }

    function render(next) {
        state = next;
        const edit = state.mode === 'edit';
        const status = state.status.state;
        const busy = status === 'processing';
        const success = status === 'success' && state.editedImage;

        $('modeEdit').classList.toggle('active', edit);
        $('modeGenerate').classList.toggle('active', !edit);

        $('error').classList.toggle('hidden', status !== 'error');
        $('error').textContent = status === 'error' ? state.status.message : '';

        $('result').classList.toggle('hidden', !success);
        $('composer').classList.toggle('hidden', !!success);
        if (success) {
            const url = imageUrl(showOriginal && state.originalImage ? 'original' : 'edited');
            if ($('resultImage').getAttribute('src') !== url) {
                $('resultImage').src = url;
            }
        }
        $('compare').classList.toggle('hidden', !(edit && state.originalImage));

        $('uploadArea').classList.toggle('hidden', !edit);
        $('creatorIntro').classList.toggle('hidden', edit);
        $('preview').classList.toggle('hidden', !state.originalImage);
        $('uploadPrompt').classList.toggle('hidden', !!state.originalImage);
        if (state.originalImage) {
            const url = imageUrl('original');
            if ($('preview').getAttribute('src') !== url) {
                $('preview').src = url;
            }
        }

        $('commandBox').classList.toggle('hidden', busy || (edit && !state.originalImage));
        $('prompt').placeholder = edit
            ? "Neural Commands: 'Add a crown', 'Change shirt color'..."
            : "Describe the photo: 'A futuristic city', 'Portrait of an astronaut'...";
        if (document.activeElement !== $('prompt')) {
            $('prompt').value = state.prompt;
        }
        $('run').textContent = edit ? 'PROCESS MASTERPIECE' : 'SYNTHESIZE PHOTO';
        $('run').disabled = busy;

        $('progressCard').classList.toggle('hidden', !busy);
        $('configCard').classList.toggle('hidden', busy);
        $('steps').innerHTML = '';
        state.steps.forEach((step, i) => {
            const li = document.createElement('li');
            li.className = step.isComplete ? 'done' : '';
            li.innerHTML = `<span class="dot">${step.isComplete ? '&#10003;' : i + 1}</span>`;
            li.append(step.label);
            $('steps').append(li);
        });
        $('barFill').style.width = `${Math.round(state.progress * 100)}%`;

        $('configTitle').textContent = edit ? 'PRO CONFIG' : 'ENGINE PARAMS';
        $('editConfig').classList.toggle('hidden', !edit);
        $('generateConfig').classList.toggle('hidden', edit);
        document.querySelectorAll('[data-flag]').forEach((el) => {
            el.classList.toggle('on', !!state.enhancements[el.dataset.flag]);
        });

        $('writing').classList.toggle('hidden', !(status === 'success' || state.originalImage));
        $('writingBusy').classList.toggle('hidden', !state.textLoading);
        document.querySelectorAll('[data-kind]').forEach((el) => { el.disabled = state.textLoading; });

        $('story').classList.toggle('hidden', !state.generatedText);
        $('storyText').textContent = state.generatedText ? `"${state.generatedText}"` : '';
    }

    async function poll() {
        await api('GET', '/api/state');
        const active = state && (state.status.state === 'processing' || state.textLoading);
        setTimeout(poll, active ? 400 : 2000);
    }

    document.querySelectorAll('[data-mode]').forEach((el) => {
        el.addEventListener('click', () => api('POST', '/api/mode', { mode: el.dataset.mode }));
    });
    document.querySelectorAll('[data-flag]').forEach((el) => {
        el.addEventListener('click', () => api('POST', `/api/enhancements/${el.dataset.flag}/toggle`));
    });
    document.querySelectorAll('[data-kind]').forEach((el) => {
        el.addEventListener('click', () => api('POST', '/api/writing', { kind: el.dataset.kind }));
    });

    $('uploadArea').addEventListener('click', () => $('fileInput').click());
    $('fileInput').addEventListener('change', async (e) => {
        const file = e.target.files[0];
        if (!file) return;
        const form = new FormData();
        form.append('image', file);
        await api('POST', '/api/upload', form);
        e.target.value = '';
    });

    $('prompt').addEventListener('change', (e) => api('POST', '/api/prompt', { text: e.target.value }));
    $('run').addEventListener('click', async () => {
        await api('POST', '/api/prompt', { text: $('prompt').value });
        await api('POST', '/api/process');
    });
    $('reset').addEventListener('click', () => api('POST', '/api/reset'));
    $('dismissStory').addEventListener('click', () => api('DELETE', '/api/writing'));

    const compare = (on) => { showOriginal = on; if (state) render(state); };
    $('compare').addEventListener('mousedown', () => compare(true));
    $('compare').addEventListener('mouseup', () => compare(false));
    $('compare').addEventListener('touchstart', () => compare(true));
    $('compare').addEventListener('touchend', () => compare(false));

    poll();
</script>
</body>
</html>
"#;
