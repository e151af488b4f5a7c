use crate::vfs::FileMap;

/// Returns the placeholder page shown before anything has been generated.
pub fn index_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="pt-br">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>AI-CRAFT Studio</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
      body { background: #0f172a; color: white; font-family: sans-serif; height: 100vh; display: flex; align-items: center; justify-content: center; margin: 0; }
      .card { background: #1e293b; padding: 2rem; border-radius: 1.5rem; border: 1px solid #334155; text-align: center; max-width: 400px; }
      .icon { font-size: 3rem; margin-bottom: 1rem; color: #6366f1; }
      h1 { margin: 0; font-size: 1.5rem; font-weight: 800; letter-spacing: -0.025em; }
      p { color: #94a3b8; font-size: 0.875rem; line-height: 1.5; margin-top: 0.5rem; }
    </style>
  </head>
  <body>
    <div class="card">
      <div class="icon">✨</div>
      <h1>Pronto para o Craft?</h1>
      <p>Configure sua integração n8n no botão "+" e descreva seu app no arquiteto ao lado.</p>
    </div>
    <script type="module" src="/main.tsx"></script>
  </body>
</html>
"#
}

/// Returns the React mount point.
pub fn main_tsx() -> &'static str {
    r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import { App } from './App';

const root = ReactDOM.createRoot(document.getElementById('root')!);
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#
}

/// Returns an empty root component.
pub fn app_tsx() -> &'static str {
    r#"import React from 'react';

export const App = () => {
  return null;
};
"#
}

/// Returns the shared type definitions stub.
pub fn types_ts() -> &'static str {
    r#"export interface User {
  id: string;
  name: string;
}
"#
}

/// The project a fresh session or a new project starts from.
pub fn starter_project() -> FileMap {
    [
        ("index.html", index_html()),
        ("main.tsx", main_tsx()),
        ("App.tsx", app_tsx()),
        ("types.ts", types_ts()),
    ]
    .into_iter()
    .map(|(path, content)| (path.to_string(), content.to_string()))
    .collect()
}
